use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "questline")]
#[command(bin_name = "questline")]
#[command(version)]
#[command(about = "Guided level flow with gated screens, in the terminal")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log for this run under the config directory"
    )]
    pub diagnostics: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
}

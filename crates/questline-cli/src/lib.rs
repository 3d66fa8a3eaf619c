pub mod cli;
pub mod dispatch;

use anyhow::{Context, Result};
use clap::Parser;
use questline_core::diagnostics::DiagnosticsSession;

use crate::cli::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let session = DiagnosticsSession::initialize(cli.diagnostics)
        .context("failed to initialize diagnostics")?;
    if let Some(path) = session.path() {
        eprintln!("Diagnostics log: {}", path.display());
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    dispatch::run_with_deps(cli, &cwd)
}

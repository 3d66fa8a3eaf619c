use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, ContentArrangement, Table};
use questline_core::config::{QuestlineConfig, load_config_or_default, resolve_config_path};
use questline_core::diagnostics;
use questline_core::doctor::{CheckState, DoctorReport, run_doctor};
use questline_tui::UiExit;

use crate::cli::{Cli, Command};

pub fn run_with_deps(cli: Cli, cwd: &Path) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(cwd),
        None => run_flow_command(cwd),
    }
}

fn run_flow_command(cwd: &Path) -> Result<()> {
    let config = ensure_config_ready()?;

    match questline_tui::run_flow(&config, cwd)? {
        UiExit::Completed => {
            diagnostics::record("session ended after completion screen");
        }
        UiExit::Canceled => {
            diagnostics::record("session canceled");
        }
    }

    Ok(())
}

fn ensure_config_ready() -> Result<QuestlineConfig> {
    let config_path = resolve_config_path().context("failed to resolve config path")?;

    load_config_or_default(&config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry, or delete it to fall back to defaults.",
            config_path.display()
        )
    })
}

fn run_doctor_command(cwd: &Path) -> Result<()> {
    let report = run_doctor(cwd);
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        let status = match check.state {
            CheckState::Pass => "PASS",
            CheckState::Fail => "FAIL",
        };

        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(status),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}

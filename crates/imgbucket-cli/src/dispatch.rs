use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table};
use imgbucket_app::App;
use imgbucket_core::doctor::DoctorReport;
use imgbucket_tui::SortExit;
use tracing::info;

use crate::cli::{Cli, Command};

pub fn run_with_deps(cli: Cli, app: &mut App) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(app),
        None => run_root_command(app),
    }
}

fn run_root_command(app: &mut App) -> Result<()> {
    app.ensure_settings_ready()?;
    let (session, source) = app.start_session()?;
    info!(?source, "starting sort session");

    match imgbucket_tui::run_sort(app, session)? {
        SortExit::Completed(log) => println!("{}", log.summary()),
        SortExit::Canceled => println!("Canceled, nothing was copied."),
    }

    Ok(())
}

fn run_doctor_command(app: &App) -> Result<()> {
    let report = app.doctor()?;
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state.to_string()),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}

use crate::cli::context::{AppContext, build_filter};
use crate::cli::parser::Commands;
use crate::core::{Clock, SystemClock};
use crate::errors::AppResult;
use crate::export::ReportBuilder;
use crate::models::{AttendanceRecord, Status};
use crate::ui::messages::warning;
use crate::utils::table::{Column, Table};
use ansi_term::Colour;

fn status_colour(status: Status) -> Colour {
    match status {
        Status::Present => Colour::Green,
        Status::OnLeave => Colour::Yellow,
        Status::Absent => Colour::Red,
    }
}

fn coords(rec: &AttendanceRecord) -> String {
    match (rec.latitude, rec.longitude) {
        (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
        (Some(lat), None) => format!("{lat:.5}, -"),
        (None, Some(lon)) => format!("-, {lon:.5}"),
        (None, None) => "-".to_string(),
    }
}

fn time_of(rec: &AttendanceRecord) -> String {
    rec.timestamp
        .as_datetime()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "??:??".to_string())
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::List { filter, today } = cmd {
        let mut report_filter = build_filter(filter)?;
        if *today {
            let day = SystemClock::from_offset_str(&ctx.cfg.utc_offset)?
                .now_in_fixed_zone()
                .date_naive();
            report_filter = report_filter.with_range(day, day);
        }

        let ledger = ctx.open_ledger()?;
        let snapshot = ledger.load_all()?;
        let subset = ReportBuilder::filter(&snapshot, &report_filter);

        if subset.is_empty() {
            warning("No attendance records found.");
            return Ok(());
        }

        let mut table = Table::new(
            ["ID", "Date", "Time", "Person", "Role", "State", "Status", "Photo", "Location"]
                .into_iter()
                .map(Column::new)
                .collect(),
        );

        for rec in &subset {
            table.add_row(vec![
                rec.id.to_string(),
                if rec.date.is_some() {
                    rec.date_str()
                } else {
                    "?".to_string()
                },
                time_of(rec),
                rec.person.clone(),
                rec.role.code().to_string(),
                rec.state.clone(),
                rec.status.to_string(),
                rec.photo_state.to_string(),
                coords(rec),
            ]);
        }

        print!("{}", table.render());
        println!();

        let summary: Vec<String> = ReportBuilder::status_counts(&subset)
            .into_iter()
            .map(|(status, n)| {
                status_colour(status)
                    .bold()
                    .paint(format!("{status}: {n}"))
                    .to_string()
            })
            .collect();
        println!("{} record(s) | {}", subset.len(), summary.join(" | "));
    }

    Ok(())
}

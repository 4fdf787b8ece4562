use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::db::log::load_log;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 40;

/// ANSI colour per logged operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "mark" => Colour::Green,
        "delete" => Colour::Red,
        "update" | "photo" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Log { print, limit } = cmd {
        if !*print {
            info("Use --print to show the internal log.");
            return Ok(());
        }

        let ledger = ctx.open_ledger()?;
        let entries = load_log(ledger.conn(), *limit)?;

        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        // widths are measured on the plain text, before painting
        let rows: Vec<(String, String, String, String, String)> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);
                let op_target = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                (
                    e.id.to_string(),
                    date,
                    e.operation,
                    truncate(&op_target, OP_WIDTH_MAX),
                    e.message,
                )
            })
            .collect();

        let id_w = rows.iter().map(|r| r.0.len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);
        let op_w = rows.iter().map(|r| r.3.chars().count()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in rows {
            let padding = " ".repeat(op_w.saturating_sub(op_target.chars().count()));
            let painted = match op_target.split_once(' ') {
                Some((op, rest)) => {
                    format!("{} {rest}", color_for_operation(&operation).paint(op))
                }
                None => color_for_operation(&operation)
                    .paint(op_target.as_str())
                    .to_string(),
            };

            println!("{id:>id_w$}: {date:<date_w$} | {painted}{padding} => {message}");
        }
    }

    Ok(())
}

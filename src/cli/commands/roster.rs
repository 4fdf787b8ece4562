use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Roster { state } = cmd {
        let directory = ctx.directory();

        let persons: Vec<_> = directory
            .list_persons()
            .iter()
            .filter(|p| {
                state
                    .as_deref()
                    .is_none_or(|s| p.state.eq_ignore_ascii_case(s))
            })
            .collect();

        if persons.is_empty() {
            warning("No people match the selection.");
            info(format!("Known states: {}", directory.states().join(", ")));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Name"),
            Column::new("Role"),
            Column::new("State"),
        ]);
        for p in persons {
            table.add_row(vec![p.name.clone(), p.role.code().to_string(), p.state.clone()]);
        }

        print!("{}", table.render());
    }

    Ok(())
}

use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::models::RecordChanges;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Edit {
        id,
        person,
        role,
        status,
        photo_state,
        lat,
        lon,
        state,
        clear_coords,
    } = cmd
    {
        let mut changes = RecordChanges {
            person: person.clone(),
            role: *role,
            status: *status,
            photo_state: *photo_state,
            latitude: lat.map(Some),
            longitude: lon.map(Some),
            state: state.clone(),
        };
        if *clear_coords {
            changes.latitude = Some(None);
            changes.longitude = Some(None);
        }

        if changes.is_empty() {
            info("Nothing to change.");
            return Ok(());
        }

        let mut ledger = ctx.open_ledger()?;
        ledger.update(*id, &changes)?;

        let rec = ledger.get(*id)?;
        success(format!(
            "Record #{} updated: {} | {} | {} | {} | {}",
            rec.id,
            rec.date_str(),
            rec.person,
            rec.role,
            rec.status,
            rec.state
        ));
    }

    Ok(())
}

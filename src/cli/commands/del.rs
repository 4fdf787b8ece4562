use crate::cli::context::AppContext;
use crate::cli::parser::Commands;
use crate::core::PhotoCleanup;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        let mut ledger = ctx.open_ledger()?;

        // fail early on an unknown id, before prompting
        let rec = ledger.get(*id)?;

        if !*yes {
            let prompt = format!(
                "Delete record #{} ({} on {})? This action is irreversible.",
                rec.id,
                rec.person,
                rec.date_str()
            );
            if !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
        }

        let cleanup = ledger.delete(*id)?;
        success(format!("Record #{id} has been deleted."));

        match cleanup {
            PhotoCleanup::NoPhoto => {}
            PhotoCleanup::Removed(path) => info(format!("Photo removed: {}", path.display())),
            PhotoCleanup::Failed { path, reason } => warning(format!(
                "Photo {} could not be removed: {reason}",
                path.display()
            )),
        }
    }

    Ok(())
}

use crate::cli::context::AppContext;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (not in test mode)
///  - the SQLite database with all pending migrations
///  - the photo directory
pub fn handle(ctx: &AppContext) -> AppResult<()> {
    let path = ctx.cfg.init_all(ctx.test)?;

    info("Initializing rAttendance…");
    if !ctx.test {
        info(format!("Config file : {}", path.display()));
    }
    info(format!("Database    : {}", ctx.cfg.database));
    info(format!("Photos      : {}", ctx.cfg.photo_dir));

    let ledger = ctx.open_ledger()?;

    if let Err(e) = log::ttlog(
        ledger.conn(),
        "init",
        "Database initialized",
        &format!("Database initialized at {}", ctx.cfg.database),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    success("rAttendance initialization completed!");
    Ok(())
}

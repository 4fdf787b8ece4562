//! rAttendance library root.
//! Exposes the CLI parser, the high-level run() function, and the ledger,
//! photo store and report modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod photos;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::context::AppContext;
use cli::parser::{Cli, Commands};
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, ctx: &AppContext) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(ctx),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, ctx),
        Commands::Roster { .. } => cli::commands::roster::handle(&cli.command, ctx),
        Commands::Mark { .. } => cli::commands::mark::handle(&cli.command, ctx),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, ctx),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, ctx),
        Commands::Photo { .. } => cli::commands::photo::handle(&cli.command, ctx),
        Commands::Del { .. } => cli::commands::del::handle(&cli.command, ctx),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, ctx),
        Commands::Photos { .. } => cli::commands::photos::handle(&cli.command, ctx),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, ctx),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once, overrides applied, then passed down
    let ctx = AppContext::from_cli(&cli)?;

    dispatch(&cli, &ctx)
}

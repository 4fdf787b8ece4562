//! Per-invocation session: the resolved configuration plus helpers to open
//! the ledger. Nothing here outlives one command.

use crate::cli::parser::{Cli, FilterArgs};
use crate::config::Config;
use crate::core::{Directory, Ledger, SystemClock};
use crate::errors::AppResult;
use crate::export::{ReportFilter, parse_range};
use crate::photos::PhotoStore;
use crate::ui::messages::info;
use crate::utils::path::expand_tilde;
use std::fs;
use std::path::Path;

pub struct AppContext {
    pub cfg: Config,
    pub test: bool,
}

impl AppContext {
    /// Configuration file (or defaults) with `--db` / `--photos` applied.
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let mut cfg = Config::load()?;

        if let Some(db) = &cli.db {
            cfg.database = expand_tilde(db).to_string_lossy().to_string();
        }
        if let Some(photos) = &cli.photos {
            cfg.photo_dir = expand_tilde(photos).to_string_lossy().to_string();
        }

        Ok(Self {
            cfg,
            test: cli.test,
        })
    }

    pub fn directory(&self) -> Directory {
        self.cfg.directory()
    }

    pub fn photo_store(&self) -> PhotoStore {
        PhotoStore::new(expand_tilde(&self.cfg.photo_dir))
    }

    /// Open the configured database and bring it up to date.
    pub fn open_ledger(&self) -> AppResult<Ledger> {
        let db_path = expand_tilde(&self.cfg.database);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let clock = SystemClock::from_offset_str(&self.cfg.utc_offset)?;
        let mut ledger = Ledger::open(
            &db_path.to_string_lossy(),
            self.photo_store(),
            Box::new(clock),
        )?;

        for step in ledger.initialize()? {
            info(format!("Applied schema migration: {step}"));
        }

        Ok(ledger)
    }
}

/// Turn `--range` / `--person` / `--state` into a report filter.
pub fn build_filter(args: &FilterArgs) -> AppResult<ReportFilter> {
    let mut filter = ReportFilter::default();

    if let Some(r) = &args.range
        && let Some((from, to)) = parse_range(r)?
    {
        filter = filter.with_range(from, to);
    }
    if !args.persons.is_empty() {
        filter = filter.with_persons(args.persons.iter().cloned());
    }
    if !args.states.is_empty() {
        filter = filter.with_states(args.states.iter().cloned());
    }

    Ok(filter)
}

/// Read a file given on the command line, keeping only its base name.
pub fn read_upload(file: &str) -> AppResult<(Vec<u8>, String)> {
    let path = expand_tilde(file);
    let bytes = fs::read(&path)?;
    let name = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());
    Ok((bytes, name))
}

use crate::core::directory::{Directory, Person, default_roster};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_UTC_OFFSET: &str = "+05:30";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,
    /// Fixed local zone used to derive the attendance day.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_roster")]
    pub roster: Vec<Person>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_photo_dir() -> String {
    Config::photo_dir_default().to_string_lossy().to_string()
}
fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            photo_dir: default_photo_dir(),
            utc_offset: default_utc_offset(),
            roster: default_roster(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rattendance")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    pub fn photo_dir_default() -> PathBuf {
        Self::config_dir().join("photos")
    }

    /// Load configuration from the standard file, or defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&content).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn parse(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Roster of people allowed to mark attendance. An empty roster falls
    /// back to the built-in one.
    pub fn directory(&self) -> Directory {
        if self.roster.is_empty() {
            Directory::new(default_roster())
        } else {
            Directory::new(self.roster.clone())
        }
    }

    /// Initialize configuration directory and file.
    ///
    /// Writes `self` (defaults plus command-line overrides) as the new
    /// configuration file, except in test mode. Returns the file path.
    pub fn init_all(&self, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let path = Self::config_file();
        if !is_test {
            let yaml = self.to_yaml()?;
            let mut file = fs::File::create(&path)?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(path)
    }
}

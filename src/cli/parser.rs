use crate::export::ExportFormat;
use crate::models::{PhotoState, Role, Status};
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// Daily attendance register for field staff, backed by SQLite
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "A field-staff attendance register: one mark per person per day, photos and exports on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the photo directory
    #[arg(global = true, long = "photos")]
    pub photos: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Record selection shared by `list`, `export` and `photos`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(
        long,
        short,
        value_name = "RANGE",
        help = "Filter by year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, A:B, all)"
    )]
    pub range: Option<String>,

    #[arg(long = "person", value_name = "NAME", help = "Only these persons (repeatable)")]
    pub persons: Vec<String>,

    #[arg(long = "state", value_name = "STATE", help = "Only these states (repeatable)")]
    pub states: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database, photo directory and configuration
    Init,

    /// View or edit the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Show the people allowed to mark attendance
    Roster {
        #[arg(long, help = "Only people from this state")]
        state: Option<String>,
    },

    /// Mark today's attendance for a person
    Mark {
        #[arg(long, help = "Name as listed in the roster")]
        person: String,

        #[arg(long, help = "Present, \"On Leave\" or Absent")]
        status: Status,

        #[arg(long, value_name = "FILE", help = "Photo to attach")]
        photo: Option<String>,

        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// List attendance records
    List {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long = "today", conflicts_with = "range", help = "Show only today's records")]
        today: bool,
    },

    /// Correct fields of an existing record
    Edit {
        id: i64,

        #[arg(long)]
        person: Option<String>,

        #[arg(long, help = "CRP, FA or Unknown")]
        role: Option<Role>,

        #[arg(long)]
        status: Option<Status>,

        #[arg(long = "photo-state", help = "\"Photo Uploaded\", \"No Photo\" or \"Photo Upload Failed\"")]
        photo_state: Option<PhotoState>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long)]
        state: Option<String>,

        #[arg(
            long = "clear-coords",
            conflicts_with_all = ["lat", "lon"],
            help = "Remove latitude and longitude"
        )]
        clear_coords: bool,
    },

    /// Show, replace or extract the photo of a record
    Photo {
        id: i64,

        #[arg(long, value_name = "FILE", help = "Replace the photo with this file")]
        file: Option<String>,

        #[arg(
            long,
            value_name = "FILE",
            conflicts_with = "file",
            help = "Copy the stored photo to this file"
        )]
        out: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete a record and its photo
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Export records as CSV, XLSX or JSON
    Export {
        #[arg(long, value_enum, help = "Output format (default: from the file extension)")]
        format: Option<ExportFormat>,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Bundle the photos of the selected records into a zip archive
    Photos {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, help = "Only the N most recent rows")]
        limit: Option<usize>,
    },
}

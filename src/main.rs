mod calc;
mod cmd;
mod data;
mod leave;
mod ui;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use data::LeaveType;
use leave::LeaveDraft;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

#[derive(Parser)]
#[command(name = "leavedesk", about = "book and manage staff leave")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./data)
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default config, owners and an empty leave cache
    Init,
    /// List cached leave events
    Leaves,
    /// List staff members and clients
    Owners,
    /// Show requests journaled to the agency ledger
    Ledger,
    /// Book new leave
    Add {
        /// Owner id (see `owners`)
        #[arg(long)]
        user: String,
        /// Leave type code, e.g. SICK_LEAVE
        #[arg(long = "type")]
        leave_type: LeaveType,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        notes: Option<String>,
        /// Hourly pay rate
        #[arg(long)]
        pay_rate: Option<String>,
    },
    /// Delete a leave event by id
    Remove { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Checked before logging starts, since the log directory lives inside it.
    let needs_init = dir_needs_init(&data_dir);
    let _guard = init_logging(&data_dir, cli.verbose)?;
    info!(data_dir = %data_dir.display(), "starting");

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && needs_init {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Leaves) => cmd::leaves::run(),
        Some(Commands::Owners) => cmd::owners::run(),
        Some(Commands::Ledger) => cmd::ledger::run(),
        Some(Commands::Add {
            user,
            leave_type,
            start,
            end,
            notes,
            pay_rate,
        }) => cmd::add::run(LeaveDraft {
            user_id: user,
            leave_type: Some(leave_type),
            start_date: Some(start),
            end_date: Some(end),
            notes: notes.unwrap_or_default(),
            pay_rate: pay_rate.unwrap_or_default(),
        }),
        Some(Commands::Remove { id }) => cmd::remove::run(&id),
    }
}

/// Daily-rotated log file under `<data_dir>/logs`; stdout stays free for the TUI.
fn init_logging(data_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("leavedesk")
        .filename_suffix("log")
        .build(data_dir.join("logs"))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;
    Ok(guard)
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

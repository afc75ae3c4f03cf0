use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use retrace_core::config::StoragePaths;
use retrace_core::{dispatch, timefmt};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{Table, Tabled};

/// Placeholder shown where the probe returned its "no information"
/// sentinel; the empty string must never be displayed as a value.
fn display_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "(unknown)"
    } else {
        value
    }
}

#[derive(Parser)]
#[command(name = "retrace")]
#[command(about = "Foreground-activity probe for the retrace capture pipeline", long_about = None)]
struct Cli {
    /// Path to store the screenshots and database
    #[arg(long, global = true)]
    storage_path: Option<PathBuf>,

    /// Only record the primary monitor
    #[arg(long, global = true, default_value_t = false)]
    primary_monitor_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe the current foreground activity once
    Status {
        /// Emit the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Poll activity on an interval, the way the capture scheduler does
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value_t = 3)]
        interval: u64,
    },
    /// Show the resolved storage paths
    Paths,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Probed at")]
    probed_at: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    match cli.command {
        Commands::Status { json } => show_status(json).await,
        Commands::Watch { interval } => watch(interval).await,
        Commands::Paths => show_paths(cli.storage_path.as_deref(), cli.primary_monitor_only),
    }
}

async fn show_status(json: bool) -> Result<()> {
    let snapshot = dispatch::snapshot().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let row = StatusRow {
        application: display_or_unknown(&snapshot.app_name).to_string(),
        window: display_or_unknown(&snapshot.window_title).to_string(),
        user: if snapshot.is_user_active {
            "active".to_string()
        } else {
            "idle".to_string()
        },
        probed_at: timefmt::absolute_description(Local::now().timestamp()),
    };
    let table = Table::new([row]).to_string();
    println!("{table}");
    Ok(())
}

/// Stand-in for the external capture scheduler: check for operator
/// activity first and only query the metadata worth tagging a capture
/// with when someone is actually there.
async fn watch(interval_secs: u64) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    log::info!("polling foreground activity every {}s", interval_secs.max(1));

    loop {
        ticker.tick().await;

        let stamp = timefmt::absolute_description(Local::now().timestamp());
        if !dispatch::is_user_active().await? {
            log::debug!("user idle; a capture tick would be skipped");
            println!("[{stamp}] idle");
            continue;
        }

        let app = dispatch::active_app_name().await?;
        let title = dispatch::active_window_title().await?;
        println!(
            "[{stamp}] active  app={}  window={}",
            display_or_unknown(&app),
            display_or_unknown(&title)
        );
    }
}

fn show_paths(override_dir: Option<&Path>, primary_monitor_only: bool) -> Result<()> {
    let paths = StoragePaths::resolve(override_dir)?;

    println!("Storage root:    {}", paths.root.display());
    println!("Screenshots dir: {}", paths.screenshots_dir.display());
    println!("Database file:   {}", paths.db_path.display());
    if primary_monitor_only {
        println!("Capture scope:   primary monitor only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_or_unknown_substitutes_sentinel() {
        assert_eq!(display_or_unknown(""), "(unknown)");
        assert_eq!(display_or_unknown("Safari"), "Safari");
    }
}

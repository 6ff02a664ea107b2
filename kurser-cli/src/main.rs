//! Kurser command line: plan, export and publish course study plans.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kurser")]
#[command(about = "Turn course study plans into calendar events")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding one file per course
    #[arg(
        short,
        long,
        global = true,
        env = "KURSER_COURSES_DIR",
        default_value = "courses"
    )]
    courses_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the events planned for every course
    Plan,

    /// Write the planned events of all courses to an ICS file
    Export {
        /// Output file path
        #[arg(short, long, default_value = "kurser.ics")]
        output: PathBuf,

        /// Calendar name written to the file
        #[arg(long, default_value = "kurser")]
        calendar_name: String,

        /// Time zone of the events
        #[arg(long, default_value = "Europe/Stockholm")]
        timezone: String,
    },

    /// Publish the planned events of all courses to Google Calendar
    Publish {
        /// OAuth access token with calendar scope
        #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// Target calendar, created when missing
        #[arg(long, default_value = "kurser")]
        calendar: String,

        /// Time zone of the events
        #[arg(long, default_value = "Europe/Stockholm")]
        timezone: String,

        /// Give up on an event after this many attempts (default: never)
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Longest single backoff sleep in seconds (default: uncapped)
        #[arg(long)]
        max_delay_secs: Option<u64>,
    },

    /// Delete the target calendar and every event in it
    DeleteCalendar {
        /// OAuth access token with calendar scope
        #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// Calendar to delete
        #[arg(long, default_value = "kurser")]
        calendar: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("kurser_cli={0},kurser_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Plan => commands::plan_command(&cli.courses_dir),

        Commands::Export {
            output,
            calendar_name,
            timezone,
        } => commands::export_command(&cli.courses_dir, &output, calendar_name, timezone),

        Commands::Publish {
            token,
            calendar,
            timezone,
            max_attempts,
            max_delay_secs,
        } => {
            commands::publish_command(commands::PublishParams {
                courses_dir: cli.courses_dir,
                token,
                calendar,
                timezone,
                max_attempts,
                max_delay_secs,
            })
            .await
        }

        Commands::DeleteCalendar { token, calendar } => {
            commands::delete_calendar_command(token, calendar).await
        }
    }
}

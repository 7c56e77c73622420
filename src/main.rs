mod constants;
mod control;
mod util;

use std::path::PathBuf;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use control::{night_mode::NightModeScheduler, provision::AddressProvisioner, timer::DailyTrigger};
use util::api_request::{DryRun, HttpTransport, Transport};
use util::config::{self, ConfigFile};

#[derive(Parser)]
#[command(name = "dimmer-setup")]
#[command(about = "Configure dimmer devices on the local network.")]
struct CommandLine {
    #[command(subcommand)]
    command: Commands,
    /// Path of the yaml config file [default: <config dir>/dimmer-setup.yaml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log device urls instead of sending requests
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Push sunset/sunrise based night mode times to all devices every day
    NightMode {
        /// Update once right now instead of waiting for the daily run time
        #[arg(long)]
        once: bool,
    },
    /// Move all devices to new wifi and ip settings, once
    Provision,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(constants::DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = CommandLine::parse();
    let path = match args.config {
        Some(path) => path,
        None => config::default_path()?,
    };
    let config_file = config::from_file(&path)
        .inspect_err(|err| error!("{err}"))
        .context("could not load config")?;

    if args.dry_run {
        info!("dry run is enabled: not sending requests to devices");
        run(args.command, config_file, DryRun).await
    } else {
        run(args.command, config_file, HttpTransport::default()).await
    }
}

async fn run<T: Transport>(command: Commands, config_file: ConfigFile, transport: T) -> anyhow::Result<()> {
    match command {
        Commands::NightMode { once } => {
            let settings = config_file.night_mode()
                .inspect_err(|err| error!(field = err.field(), "invalid config: {err}"))?;
            let trigger = DailyTrigger::new(settings.run_time, settings.timezone);
            let today = chrono::Utc::now().with_timezone(&settings.timezone).date_naive();
            let mut scheduler = NightModeScheduler::new(settings.clone(), settings.location, transport);

            if once {
                scheduler.run_pass(today).await?;
            } else {
                info!("updating night mode of {} devices daily at {}", settings.devices.len(), settings.run_time);
                scheduler.run_daily(&trigger).await;
            }
        }
        Commands::Provision => {
            let settings = config_file.provision()
                .inspect_err(|err| error!(field = err.field(), "invalid config: {err}"))?;
            AddressProvisioner::new(settings, transport).run().await?;
        }
    }
    Ok(())
}

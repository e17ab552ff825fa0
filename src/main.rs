//! livecfg: live configuration registry with a configuration-driven logger.
//!
//! # Architecture Overview
//!
//! ```text
//!     config file (YAML/TOML)
//!            │  load (startup, SIGHUP)
//!            ▼
//!     ┌──────────────┐   flatten    ┌──────────────┐   set_value   ┌───────────┐
//!     │   document   │ ───────────► │   registry   │ ────────────► │ listeners │
//!     │  Node tree   │  dotted keys │  ConfigVar<T>│   (old, new)  └─────┬─────┘
//!     └──────────────┘              └──────────────┘                     │
//!                                                                        ▼
//!                                   ┌─────────────────────────────────────────┐
//!                                   │ logging: reconcile "logs" → emitters,   │
//!                                   │ destinations, compiled patterns         │
//!                                   └─────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use livecfg::config::{dump, Registry};
use livecfg::lifecycle::{startup, Shutdown, Signal, SignalListener};
use livecfg::{log_info, logging};

#[derive(Parser)]
#[command(name = "livecfg")]
#[command(about = "Load a configuration file and drive the logging pipeline from it", long_about = None)]
struct Cli {
    /// YAML or TOML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Print the registry after loading and exit
    #[arg(long)]
    dump: bool,

    /// Print the dump as JSON
    #[arg(long, requires = "dump")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livecfg=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let manager = startup::start(&cli.config)?;

    if cli.dump {
        let registry = Registry::global();
        if cli.json {
            println!("{}", dump::to_json(registry)?);
        } else {
            print!("{}", dump::to_text(registry));
        }
        return Ok(());
    }

    let root = logging::root();
    log_info!(root, "livecfg started with {}", cli.config.display());
    for name in manager.names() {
        log_info!(manager.get_logger(&name), "logger {name} is live");
    }

    let shutdown = Shutdown::new();
    let mut stop = shutdown.subscribe();
    let mut signals = SignalListener::new()?;

    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Signal::Reload => {
                    if let Err(e) = startup::load(&cli.config) {
                        tracing::error!(error = %e, "Reload failed, keeping current configuration");
                    }
                }
                Signal::Reopen => {
                    if let Err(e) = manager.reopen_files() {
                        tracing::error!(error = %e, "Failed to reopen log files");
                    }
                }
                Signal::Terminate => {
                    tracing::info!("Shutdown requested");
                    shutdown.trigger();
                }
            },
            _ = stop.recv() => break,
        }
    }

    log_info!(root, "livecfg stopped");
    tracing::info!("Shutdown complete");
    Ok(())
}

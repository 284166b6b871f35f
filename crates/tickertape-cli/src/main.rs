use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tickertape_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tickertape")]
#[command(author, version, about = "A terminal marquee for text too wide for its line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the marquee demo
    Run {
        /// Texts to cycle through (defaults to the configured texts)
        texts: Vec<String>,
    },
    /// Print the fit decision for a container and content width
    Fit {
        /// Container width
        #[arg(long)]
        container: f64,
        /// Content width
        #[arg(long)]
        content: f64,
        /// Extra overflow slack added to the distance
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // The TUI owns the terminal, so it logs to a file
    let tui = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, tui)?;

    match cli.command {
        Some(Commands::Run { texts }) => commands::run::run(config, texts).await,
        None => commands::run::run(config, Vec::new()).await,
        Some(Commands::Fit {
            container,
            content,
            threshold,
        }) => commands::fit::run(&config, container, content, threshold),
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

//! `rinsefm` CLI - extract Rinse FM channels and episodes

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rinsefm::Config;

#[derive(Parser)]
#[command(name = "rinsefm")]
#[command(about = "Extract stream URLs and metadata from Rinse FM channels and episodes")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.config/rinsefm/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata and formats for a channel or episode URL
    Extract {
        /// Channel (/channels/<slug>) or episode (/episodes/<slug>) URL
        url: String,

        /// Exit successfully when the media is known to be unavailable
        #[arg(long)]
        skip_expected: bool,

        /// Keep unreachable media URLs instead of failing
        #[arg(long)]
        lenient_probe: bool,

        /// Characters decoded per scanner chunk
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Probe a media URL and print its format
    Probe {
        /// Direct media URL
        url: String,

        /// Keep the URL when it cannot be reached
        #[arg(long)]
        lenient: bool,
    },

    /// Print the __NEXT_DATA__ payload of a saved HTML page
    Scan {
        /// HTML file to scan
        file: PathBuf,

        /// Print only props.pageProps.entry
        #[arg(short, long)]
        entry: bool,

        /// Characters decoded per scanner chunk
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// List registered extractors
    Extractors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Extract {
            url,
            skip_expected,
            lenient_probe,
            chunk_size,
            compact,
        } => {
            if let Some(size) = chunk_size {
                config.scanner.chunk_size = size;
            }
            if lenient_probe {
                config.probe.dead_links = rinsefm::DeadLinkPolicy::Fallback;
            }
            cmd::extract::cmd_extract(&url, &config, skip_expected, compact)?;
        }
        Commands::Probe { url, lenient } => {
            if lenient {
                config.probe.dead_links = rinsefm::DeadLinkPolicy::Fallback;
            }
            cmd::probe::cmd_probe(&url, &config)?;
        }
        Commands::Scan {
            file,
            entry,
            chunk_size,
        } => {
            let chunk_size = chunk_size.unwrap_or(config.scanner.chunk_size);
            cmd::scan::cmd_scan(&file, entry, chunk_size)?;
        }
        Commands::Extractors => {
            cmd::extract::cmd_extractors(&config)?;
        }
    }

    Ok(())
}

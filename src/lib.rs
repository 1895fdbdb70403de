//! `rinsefm` - Rinse FM live channel and replay episode extraction
//!
//! # Features
//!
//! - **Streaming payload scan**: finds the Next.js `__NEXT_DATA__` JSON in a
//!   page with the html5ever tokenizer, reading only up to the payload
//! - **Normalization**: channel and episode entries become [`MediaInfo`]
//!   records (release time, duration in seconds, genres)
//! - **Format probing**: final URL, extension and size of the media, with
//!   expired replays reported as an expected outcome
//!
//! # Example
//!
//! ```rust,no_run
//! use rinsefm::{Config, ExtractorRegistry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = ExtractorRegistry::from_config(&Config::default())?;
//!     match registry.extract("https://rinse.fm/episodes/some-show-01-05-2023") {
//!         Ok(info) => println!("{}", serde_json::to_string_pretty(&info)?),
//!         Err(e) if e.is_expected() => eprintln!("skipping: {e}"),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http_client;
pub mod nextdata;
pub mod site;
pub mod util;

pub use config::Config;
pub use error::ExtractError;
pub use http_client::{Fetch, HttpClient, Page};
pub use nextdata::{extract_payload, PayloadExtractor, ScanError};
pub use site::{
    DeadLinkPolicy, ExtractorRegistry, Format, FormatResolver, MediaInfo, RinseSite, SiteExtractor,
};

/// Version of rinsefm
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

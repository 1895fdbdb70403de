use anyhow::{Context, Result};
use tracing::warn;

use rinsefm::{Config, ExtractorRegistry};

use super::output::print_json;

pub fn cmd_extract(url: &str, config: &Config, skip_expected: bool, compact: bool) -> Result<()> {
    let registry = ExtractorRegistry::from_config(config).context("failed to build HTTP client")?;

    match registry.extract(url) {
        Ok(info) => print_json(&info, compact),
        Err(e) if skip_expected && e.is_expected() => {
            warn!("Skipping: {e}");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("extraction failed for {url}")),
    }
}

pub fn cmd_extractors(config: &Config) -> Result<()> {
    let registry = ExtractorRegistry::from_config(config).context("failed to build HTTP client")?;
    for extractor in registry.extractors() {
        println!("{}", extractor.name());
    }
    Ok(())
}

use std::sync::Arc;

use anyhow::{Context, Result};

use rinsefm::{Config, FormatResolver, HttpClient};

use super::output::print_json;

pub fn cmd_probe(url: &str, config: &Config) -> Result<()> {
    let client = HttpClient::with_config(&config.http).context("failed to build HTTP client")?;
    let resolver = FormatResolver::new(Arc::new(client), config.probe.dead_links);

    let formats = resolver
        .resolve(url, "probe")
        .with_context(|| format!("probe failed for {url}"))?;
    print_json(&formats, false)
}

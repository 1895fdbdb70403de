use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use rinsefm::extract_payload;

use super::output::print_json;

pub fn cmd_scan(file: &Path, entry_only: bool, chunk_size: usize) -> Result<()> {
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("failed to open {}", file.display()))?,
    );

    let Some(payload) = extract_payload(reader, chunk_size)
        .with_context(|| format!("failed to scan {}", file.display()))?
    else {
        bail!("no __NEXT_DATA__ payload found in {}", file.display());
    };

    let data: Value = serde_json::from_str(&payload).context("payload is not valid JSON")?;
    if entry_only {
        let Some(entry) = data.pointer("/props/pageProps/entry") else {
            bail!("payload has no props.pageProps.entry");
        };
        print_json(entry, false)
    } else {
        print_json(&data, false)
    }
}

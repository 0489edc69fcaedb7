//! List command implementation - show the entries of a databases.json listing

use anyhow::Result;
use std::path::Path;

use pcoord_core::registry::DEFAULT_FILE_PATTERN;

use crate::config::OutputFormat;
use crate::loader;

pub fn execute(listing: &Path, format: OutputFormat) -> Result<()> {
    let entries = loader::read_listing(listing)?;
    log::info!("Found {} databases in {}", entries.len(), listing.display());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            for entry in &entries {
                println!(
                    "{:<24} {:<32} files: {}",
                    entry.display_name(),
                    entry.directory,
                    entry.filter.as_deref().unwrap_or(DEFAULT_FILE_PATTERN)
                );
            }
        }
    }
    Ok(())
}

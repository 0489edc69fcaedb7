//! Show command implementation - details of a single row

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use pcoord_core::types::is_image_file;

use crate::config::{Config, OutputFormat};
use crate::DatabaseArgs;

#[derive(Debug, Serialize)]
struct FileInfo {
    dimension: String,
    path: PathBuf,
    image: bool,
}

pub fn execute(config: &Config, db: DatabaseArgs, row: usize, format: OutputFormat) -> Result<()> {
    let (session, source) = super::open_session(config, &db)?;
    let values = session.row_info(row)?;
    let files: Vec<FileInfo> = session
        .database()
        .files_of(row)
        .into_iter()
        .map(|(dimension, value)| FileInfo {
            dimension: dimension.to_string(),
            image: is_image_file(&value),
            path: source.directory.join(value),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "row": row, "values": values, "files": files });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let width = values.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, value) in &values {
                println!("{name:<width$}  {value}");
            }
            for file in &files {
                let kind = if file.image { "image" } else { "file" };
                println!("{} {}: {}", kind, file.dimension, file.path.display());
            }
        }
    }
    Ok(())
}

//! Info command implementation - describe the dimensions of a database

use anyhow::Result;
use serde::Serialize;

use pcoord_core::types::is_image_file;
use pcoord_core::{DimensionKind, Domain};

use crate::config::{Config, OutputFormat};
use crate::DatabaseArgs;

#[derive(Debug, Serialize)]
struct DimensionInfo {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ticks: Vec<f64>,
    distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<usize>,
}

pub fn execute(config: &Config, db: DatabaseArgs, format: OutputFormat) -> Result<()> {
    let (session, source) = super::open_session(config, &db)?;
    let database = session.database();

    let dimensions: Vec<DimensionInfo> = database
        .dimensions()
        .iter()
        .enumerate()
        .map(|(i, dim)| {
            let (min, max) = match dim.domain {
                Domain::Range { min, max } => (Some(min), Some(max)),
                Domain::Values(_) => (None, None),
            };
            let ticks = match (dim.kind, session.scales().axis(i)) {
                (DimensionKind::Numeric, Some(axis)) => axis.ticks(5),
                _ => Vec::new(),
            };
            let images = (dim.kind == DimensionKind::FileReference)
                .then(|| dim.categories().iter().filter(|v| is_image_file(v)).count());
            DimensionInfo {
                name: dim.name.clone(),
                kind: dim.kind.to_string(),
                min,
                max,
                ticks,
                distinct: dim.categories().len(),
                images,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "name": source.name,
                "data": source.data,
                "rows": database.len(),
                "dimensions": dimensions,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} ({} rows, {} dimensions)", source.name, database.len(), dimensions.len());
            for info in &dimensions {
                let detail = match (info.min, info.max) {
                    (Some(min), Some(max)) => format!("[{min}, {max}]"),
                    _ => format!("{} distinct values", info.distinct),
                };
                let images = info
                    .images
                    .map(|n| format!(", {n} images"))
                    .unwrap_or_default();
                println!("  {:<24} {:<12} {}{}", info.name, info.kind, detail, images);
            }
        }
    }
    Ok(())
}

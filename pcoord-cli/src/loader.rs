//! Reading cinema databases from disk.
//!
//! A database is a directory holding `data.csv`. A `databases.json` listing
//! names several of them, each with an optional regex marking its
//! file-reference columns.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use pcoord_core::RawRow;

use crate::error::CliError;

pub const DATA_FILE: &str = "data.csv";

/// Header and records of a `data.csv`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub names: Vec<String>,
    pub rows: Vec<RawRow>,
}

pub fn read_csv_file(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    let file = fs::File::open(path).with_context(|| format!("failed to open CSV file {}", path.display()))?;
    read_csv(file, &path.display().to_string())
}

pub fn read_csv<R: Read>(reader: R, label: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let names = reader
        .headers()
        .map(|h| h.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
        .map_err(|e| CliError::parse(label.to_string(), e.to_string()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CliError::parse(label.to_string(), e.to_string()))?;
        let row: RawRow = names
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    log::debug!("Read {} rows with {} columns from {}", rows.len(), names.len(), label);
    Ok(Table { names, rows })
}

/// One entry of a `databases.json` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub directory: String,
    /// Regex over column names marking file references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl DatabaseEntry {
    /// The name shown to users; the directory when no name is given.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.directory)
    }
}

pub fn read_listing(path: &Path) -> Result<Vec<DatabaseEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read database listing {}", path.display()))?;
    let entries: Vec<DatabaseEntry> = serde_json::from_str(&text)
        .map_err(|e| CliError::parse(path.display().to_string(), e.to_string()))?;
    Ok(entries)
}

/// Where a database's data lives and how to classify it.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSource {
    pub name: String,
    pub directory: PathBuf,
    pub data: PathBuf,
    pub filter: Option<String>,
}

fn is_listing(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
}

/// Resolve a command-line database argument.
///
/// Accepts a database directory, a `data.csv` file, or a `.json` listing; in
/// the last case `name` picks the entry and defaults to the first one.
pub fn resolve(path: &Path, name: Option<&str>) -> Result<DatabaseSource> {
    if path.is_dir() {
        return Ok(DatabaseSource {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            directory: path.to_path_buf(),
            data: path.join(DATA_FILE),
            filter: None,
        });
    }
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    if is_listing(path) {
        let entries = read_listing(path)?;
        let entry = match name {
            Some(wanted) => entries.iter().find(|e| e.display_name() == wanted),
            None => entries.first(),
        };
        let Some(entry) = entry else {
            return Err(CliError::UnknownDatabase {
                name: name.unwrap_or_default().to_string(),
                listing: path.to_path_buf(),
                available: entries.iter().map(|e| e.display_name().to_string()).collect(),
            }
            .into());
        };
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let directory = base.join(&entry.directory);
        return Ok(DatabaseSource {
            name: entry.display_name().to_string(),
            data: directory.join(DATA_FILE),
            directory,
            filter: entry.filter.clone(),
        });
    }

    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(DatabaseSource {
        name: path.display().to_string(),
        directory,
        data: path.to_path_buf(),
        filter: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "time, phi ,FILE\n0,a,img/0.png\n1.5, b ,img/1.png\n";

    #[test]
    fn test_read_csv_trims_cells() {
        let table = read_csv(CSV.as_bytes(), "inline").unwrap();
        assert_eq!(table.names, vec!["time", "phi", "FILE"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1]["phi"], "b");
        assert_eq!(table.rows[1]["FILE"], "img/1.png");
    }

    #[test]
    fn test_ragged_rows_fail() {
        let err = read_csv("a,b\n1\n".as_bytes(), "ragged").unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli, CliError::Parse { .. }));
    }

    #[test]
    fn test_resolve_directory_and_listing() -> Result<()> {
        let dir = TempDir::new()?;
        let db_dir = dir.path().join("sphere.cdb");
        fs::create_dir(&db_dir)?;
        fs::write(db_dir.join(DATA_FILE), CSV)?;
        let listing = dir.path().join("databases.json");
        fs::write(
            &listing,
            r#"[{"name": "Sphere", "directory": "sphere.cdb", "filter": "^FILE|^img"},
                {"directory": "other.cdb"}]"#,
        )?;

        let source = resolve(&db_dir, None)?;
        assert_eq!(source.data, db_dir.join(DATA_FILE));
        assert_eq!(source.name, "sphere.cdb");

        let source = resolve(&listing, Some("Sphere"))?;
        assert_eq!(source.data, db_dir.join(DATA_FILE));
        assert_eq!(source.filter.as_deref(), Some("^FILE|^img"));

        let source = resolve(&listing, Some("other.cdb"))?;
        assert_eq!(source.filter, None);

        let err = resolve(&listing, Some("torus")).unwrap_err();
        match err.downcast_ref::<CliError>() {
            Some(CliError::UnknownDatabase { available, .. }) => {
                assert_eq!(available, &vec!["Sphere".to_string(), "other.cdb".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_path() {
        let err = resolve(Path::new("/definitely/not/here.csv"), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound { .. })
        ));
    }
}

//! Dimension registry: column classification and domain discovery.
//!
//! Every column is classified exactly once, when a database is loaded. A column
//! whose name matches the [`FileRule`] is a file reference; otherwise it is
//! numeric when every cell parses as a finite number and categorical when any
//! cell does not.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use thiserror::Error;

use crate::types::{Dimension, DimensionKind, Domain};

/// One parsed record as handed over by the loading collaborator.
pub type RawRow = HashMap<String, String>;

pub const DEFAULT_FILE_PATTERN: &str = "^FILE";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("database declares no dimensions")]
    EmptyHeader,
    #[error("dimension declared twice: {0}")]
    DuplicateDimension(String),
    #[error("row {row} is missing dimension '{dimension}'")]
    MissingDimension { row: usize, dimension: String },
    #[error("row {row} contains undeclared dimension '{dimension}'")]
    UndeclaredDimension { row: usize, dimension: String },
    #[error("invalid file-reference pattern: {0}")]
    InvalidFilePattern(#[from] regex::Error),
}

/// Decides which dimension names refer to files.
#[derive(Debug, Clone)]
pub struct FileRule {
    pattern: Option<Regex>,
}

impl FileRule {
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
        })
    }

    /// A rule that never matches; every column is numeric or categorical.
    pub fn disabled() -> Self {
        Self { pattern: None }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(name))
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}

impl Default for FileRule {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_FILE_PATTERN).ok(),
        }
    }
}

/// Parse a cell the way the viewer treats "numbers": finite floats only.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Check that every row carries exactly the declared dimensions.
pub fn validate_rows(rows: &[RawRow], names: &[String]) -> Result<(), SchemaError> {
    if names.is_empty() {
        return Err(SchemaError::EmptyHeader);
    }

    let mut declared = HashSet::with_capacity(names.len());
    for name in names {
        if !declared.insert(name.as_str()) {
            return Err(SchemaError::DuplicateDimension(name.clone()));
        }
    }

    for (i, row) in rows.iter().enumerate() {
        if let Some(missing) = names.iter().find(|name| !row.contains_key(name.as_str())) {
            return Err(SchemaError::MissingDimension {
                row: i,
                dimension: missing.clone(),
            });
        }
        // Same key count plus no missing names means no extras either,
        // but report the offending key when there is one.
        if row.len() != names.len() {
            if let Some(extra) = row.keys().find(|key| !declared.contains(key.as_str())) {
                return Err(SchemaError::UndeclaredDimension {
                    row: i,
                    dimension: extra.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Classify each named column over all rows.
///
/// Fails with [`SchemaError`] if the rows do not all carry exactly the declared
/// dimensions; nothing is returned in that case.
pub fn classify(
    rows: &[RawRow],
    names: &[String],
    rule: &FileRule,
) -> Result<Vec<Dimension>, SchemaError> {
    validate_rows(rows, names)?;

    let dimensions: Vec<Dimension> = names
        .iter()
        .map(|name| classify_column(name, rows, rule))
        .collect();

    for dim in &dimensions {
        if dim.domain.is_degenerate() && dim.kind.is_numeric() {
            log::warn!("Dimension '{}' has a degenerate domain", dim.name);
        }
    }
    log::info!(
        "Classified {} dimensions over {} rows ({} numeric)",
        dimensions.len(),
        rows.len(),
        dimensions.iter().filter(|d| d.kind.is_numeric()).count()
    );
    Ok(dimensions)
}

fn classify_column(name: &str, rows: &[RawRow], rule: &FileRule) -> Dimension {
    // Rows were validated, so indexing by a declared name cannot miss.
    let cells = || rows.iter().filter_map(move |row| row.get(name)).map(String::as_str);

    if !rule.matches(name) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut numeric = !rows.is_empty();
        for cell in cells() {
            match parse_number(cell) {
                Some(n) => {
                    min = min.min(n);
                    max = max.max(n);
                }
                None => {
                    numeric = false;
                    break;
                }
            }
        }
        if numeric {
            return Dimension {
                name: name.to_string(),
                kind: DimensionKind::Numeric,
                domain: Domain::Range { min, max },
            };
        }
    }

    let kind = if rule.matches(name) {
        DimensionKind::FileReference
    } else {
        DimensionKind::Categorical
    };
    Dimension {
        name: name.to_string(),
        kind,
        domain: Domain::Values(distinct_in_order(cells())),
    }
}

fn distinct_in_order<'a>(cells: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for cell in cells {
        if seen.insert(cell) {
            values.push(cell.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_and_categorical() {
        let rows = vec![
            row(&[("temp", "10"), ("material", "steel")]),
            row(&[("temp", "-2.5"), ("material", "glass")]),
            row(&[("temp", "40"), ("material", "steel")]),
        ];
        let dims = classify(&rows, &names(&["temp", "material"]), &FileRule::default()).unwrap();

        assert_eq!(dims[0].kind, DimensionKind::Numeric);
        assert_eq!(dims[0].domain, Domain::Range { min: -2.5, max: 40.0 });
        assert_eq!(dims[1].kind, DimensionKind::Categorical);
        assert_eq!(dims[1].categories(), &["steel".to_string(), "glass".to_string()]);
    }

    #[test]
    fn test_one_bad_cell_makes_column_categorical() {
        let rows = vec![row(&[("x", "1")]), row(&[("x", "n/a")]), row(&[("x", "3")])];
        let dims = classify(&rows, &names(&["x"]), &FileRule::default()).unwrap();
        assert_eq!(dims[0].kind, DimensionKind::Categorical);
        assert_eq!(dims[0].categories().len(), 3);
    }

    #[test]
    fn test_file_rule_wins_over_numeric_shape() {
        let rows = vec![row(&[("FILE_image", "1"), ("time", "0")])];
        let dims = classify(&rows, &names(&["FILE_image", "time"]), &FileRule::default()).unwrap();
        assert_eq!(dims[0].kind, DimensionKind::FileReference);
        assert_eq!(dims[1].kind, DimensionKind::Numeric);

        let dims = classify(&rows, &names(&["FILE_image", "time"]), &FileRule::disabled()).unwrap();
        assert_eq!(dims[0].kind, DimensionKind::Numeric);
    }

    #[test]
    fn test_custom_file_rule() {
        let rule = FileRule::new("_path$").unwrap();
        assert!(rule.matches("image_path"));
        assert!(!rule.matches("FILE"));
        assert!(matches!(FileRule::new("("), Err(SchemaError::InvalidFilePattern(_))));
    }

    #[test]
    fn test_missing_dimension_is_schema_error() {
        let rows = vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "1")])];
        let err = classify(&rows, &names(&["a", "b"]), &FileRule::default()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingDimension { row: 1, .. }));
    }

    #[test]
    fn test_undeclared_dimension_is_schema_error() {
        let rows = vec![row(&[("a", "1"), ("z", "2")])];
        let err = classify(&rows, &names(&["a"]), &FileRule::default()).unwrap_err();
        match err {
            SchemaError::UndeclaredDimension { row, dimension } => {
                assert_eq!(row, 0);
                assert_eq!(dimension, "z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 3.5 "), Some(3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }
}

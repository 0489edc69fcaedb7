//! Immutable, typed in-memory cinema database.

use std::collections::HashMap;

use crate::registry::{self, FileRule, RawRow, SchemaError};
use crate::types::{DimIndex, Dimension, DimensionKind, Domain, Row, RowIndex, Value};

#[derive(Debug, Clone)]
pub struct Database {
    dimensions: Vec<Dimension>,
    by_name: HashMap<String, DimIndex>,
    rows: Vec<Row>,
}

impl Database {
    /// Classify and convert raw records. No database exists if this fails.
    pub fn load(names: &[String], raw: &[RawRow], rule: &FileRule) -> Result<Self, SchemaError> {
        let dimensions = registry::classify(raw, names, rule)?;

        let lookups: Vec<Option<HashMap<&str, u32>>> = dimensions
            .iter()
            .map(|dim| match &dim.domain {
                Domain::Values(values) => Some(
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (v.as_str(), i as u32))
                        .collect(),
                ),
                Domain::Range { .. } => None,
            })
            .collect();

        let rows = raw
            .iter()
            .map(|record| {
                let values = dimensions
                    .iter()
                    .zip(&lookups)
                    .map(|(dim, lookup)| {
                        let cell = record.get(&dim.name).map(String::as_str).unwrap_or_default();
                        typed_value(cell, lookup.as_ref())
                    })
                    .collect();
                Row::new(values)
            })
            .collect();

        Ok(Self::from_parts(dimensions, rows))
    }

    /// Assemble a database from already-typed parts.
    ///
    /// Callers are responsible for rows matching the dimension list.
    pub fn from_parts(dimensions: Vec<Dimension>, rows: Vec<Row>) -> Self {
        let by_name = dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self {
            dimensions,
            by_name,
            rows,
        }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, dim: DimIndex) -> Option<&Dimension> {
        self.dimensions.get(dim)
    }

    pub fn dimension_index(&self, name: &str) -> Option<DimIndex> {
        self.by_name.get(name).copied()
    }

    pub fn dimension_by_name(&self, name: &str) -> Option<&Dimension> {
        self.dimension_index(name).and_then(|i| self.dimensions.get(i))
    }

    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.name.as_str())
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Dimensions that take part in brushing and similarity queries.
    pub fn numeric_dimensions(&self) -> impl Iterator<Item = (DimIndex, &Dimension)> {
        self.dimensions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kind == DimensionKind::Numeric)
    }

    pub fn file_dimensions(&self) -> impl Iterator<Item = (DimIndex, &Dimension)> {
        self.dimensions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kind == DimensionKind::FileReference)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: RowIndex) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, row: RowIndex, dim: DimIndex) -> Option<Value> {
        self.rows.get(row).and_then(|r| r.get(dim))
    }

    pub fn number(&self, row: RowIndex, dim: DimIndex) -> Option<f64> {
        self.value(row, dim).and_then(Value::as_number)
    }

    /// Cell rendered back to text, categories resolved through the domain.
    pub fn display_value(&self, row: RowIndex, dim: DimIndex) -> Option<String> {
        let value = self.value(row, dim)?;
        match value {
            Value::Number(n) => Some(format_number(n)),
            Value::Category(id) => self
                .dimensions
                .get(dim)
                .and_then(|d| d.domain.category(id))
                .map(str::to_string),
        }
    }

    /// File-reference cells of one row, in column order.
    pub fn files_of(&self, row: RowIndex) -> Vec<(&str, String)> {
        self.file_dimensions()
            .filter_map(|(i, d)| self.display_value(row, i).map(|v| (d.name.as_str(), v)))
            .collect()
    }
}

fn typed_value(cell: &str, categories: Option<&HashMap<&str, u32>>) -> Value {
    match categories {
        None => Value::Number(registry::parse_number(cell).unwrap_or(f64::NAN)),
        Some(lookup) => Value::Category(lookup.get(cell).copied().unwrap_or(u32::MAX)),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Database {
        let names: Vec<String> = ["time", "phi", "FILE"].iter().map(|s| s.to_string()).collect();
        let raw: Vec<RawRow> = [
            ("0", "a", "img/0.png"),
            ("1.5", "b", "img/1.png"),
            ("3", "a", "img/2.png"),
        ]
        .iter()
        .map(|(t, p, f)| {
            [("time", *t), ("phi", *p), ("FILE", *f)]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .collect();
        Database::load(&names, &raw, &FileRule::default()).unwrap()
    }

    #[test]
    fn test_load_types_cells() {
        let db = sample();
        assert_eq!(db.len(), 3);
        assert_eq!(db.number(1, 0), Some(1.5));
        assert_eq!(db.value(2, 1), Some(Value::Category(0)));
        assert_eq!(db.display_value(1, 1).as_deref(), Some("b"));
        assert_eq!(db.display_value(2, 0).as_deref(), Some("3"));
        assert_eq!(db.dimension_index("FILE"), Some(2));
        assert_eq!(db.numeric_dimensions().count(), 1);
    }

    #[test]
    fn test_files_of_row() {
        let db = sample();
        assert_eq!(db.files_of(1), vec![("FILE", "img/1.png".to_string())]);
    }
}

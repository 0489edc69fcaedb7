//! Axis display order and named orderings.
//!
//! An [`AxisOrder`] is a permutation of the database's dimensions. It only
//! changes how paths are laid out, never what the database contains.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::Database;
use crate::types::DimIndex;

#[derive(Debug, Error)]
pub enum AxisOrderError {
    #[error("unknown dimension in axis order: {0}")]
    UnknownDimension(String),
    #[error("axis order is not a permutation of the {expected} dimensions (got {got} entries)")]
    NotAPermutation { expected: usize, got: usize },
    #[error("dimension listed twice in axis order: {0}")]
    Repeated(String),
    #[error("no axis ordering named '{0}'")]
    UnknownOrdering(String),
    #[error("axis slot {slot} out of range ({len} axes)")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisOrder {
    order: Vec<DimIndex>,
}

impl AxisOrder {
    /// Declared column order.
    pub fn identity(count: usize) -> Self {
        Self {
            order: (0..count).collect(),
        }
    }

    pub fn from_names<S: AsRef<str>>(db: &Database, names: &[S]) -> Result<Self, AxisOrderError> {
        let expected = db.dimension_count();
        if names.len() != expected {
            return Err(AxisOrderError::NotAPermutation {
                expected,
                got: names.len(),
            });
        }
        let mut seen = vec![false; expected];
        let mut order = Vec::with_capacity(expected);
        for name in names {
            let name = name.as_ref();
            let dim = db
                .dimension_index(name)
                .ok_or_else(|| AxisOrderError::UnknownDimension(name.to_string()))?;
            if std::mem::replace(&mut seen[dim], true) {
                return Err(AxisOrderError::Repeated(name.to_string()));
            }
            order.push(dim);
        }
        Ok(Self { order })
    }

    pub fn as_slice(&self) -> &[DimIndex] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = DimIndex> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn slot_of(&self, dim: DimIndex) -> Option<usize> {
        self.order.iter().position(|&d| d == dim)
    }

    /// Drag an axis from one slot to another, shifting the axes in between.
    pub fn move_axis(&mut self, from: usize, to: usize) -> Result<(), AxisOrderError> {
        let len = self.order.len();
        for slot in [from, to] {
            if slot >= len {
                return Err(AxisOrderError::SlotOutOfRange { slot, len });
            }
        }
        let dim = self.order.remove(from);
        self.order.insert(to, dim);
        Ok(())
    }

    pub fn names<'a>(&self, db: &'a Database) -> Vec<&'a str> {
        self.order
            .iter()
            .filter_map(|&d| db.dimension(d).map(|dim| dim.name.as_str()))
            .collect()
    }
}

/// One entry of an external axis-ordering dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedOrdering {
    pub name: String,
    pub order: Vec<String>,
}

/// Named orderings supplied alongside a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisOrderings {
    pub orderings: Vec<NamedOrdering>,
}

impl AxisOrderings {
    pub fn from_json(text: &str) -> Result<Self, AxisOrderError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.orderings.iter().map(|o| o.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&NamedOrdering> {
        self.orderings.iter().find(|o| o.name == name)
    }

    /// Validate a named ordering against a database.
    pub fn resolve(&self, name: &str, db: &Database) -> Result<AxisOrder, AxisOrderError> {
        let ordering = self
            .get(name)
            .ok_or_else(|| AxisOrderError::UnknownOrdering(name.to_string()))?;
        AxisOrder::from_names(db, &ordering.order)
    }
}

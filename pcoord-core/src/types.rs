use serde::{Deserialize, Serialize};

/// Stable position of a row in the database's row sequence.
pub type RowIndex = usize;

/// Position of a dimension in the database's declared column order.
pub type DimIndex = usize;

/// How a column was classified at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    Numeric,
    Categorical,
    /// Path to an artifact on disk; laid out as an axis but never brushed or queried.
    FileReference,
}

impl DimensionKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, DimensionKind::Numeric)
    }
}

impl std::fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DimensionKind::Numeric => "numeric",
            DimensionKind::Categorical => "categorical",
            DimensionKind::FileReference => "file",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Range { min: f64, max: f64 },
    /// Distinct values in first-seen order.
    Values(Vec<String>),
}

impl Domain {
    /// Width of a numeric domain; zero for value sets.
    pub fn span(&self) -> f64 {
        match self {
            Domain::Range { min, max } => (max - min).abs(),
            Domain::Values(_) => 0.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match self {
            Domain::Range { min, max } => min == max,
            Domain::Values(values) => values.len() <= 1,
        }
    }

    pub fn category(&self, id: u32) -> Option<&str> {
        match self {
            Domain::Values(values) => values.get(id as usize).map(String::as_str),
            Domain::Range { .. } => None,
        }
    }

    pub fn category_id(&self, value: &str) -> Option<u32> {
        match self {
            Domain::Values(values) => values.iter().position(|v| v == value).map(|i| i as u32),
            Domain::Range { .. } => None,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            Domain::Range { min, max } => value.max(*min).min(*max),
            Domain::Values(_) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub kind: DimensionKind,
    pub domain: Domain,
}

impl Dimension {
    pub fn numeric_range(&self) -> Option<(f64, f64)> {
        match (&self.kind, &self.domain) {
            (DimensionKind::Numeric, Domain::Range { min, max }) => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn categories(&self) -> &[String] {
        match &self.domain {
            Domain::Values(values) => values,
            Domain::Range { .. } => &[],
        }
    }
}

/// A single cell, typed once at classification time.
///
/// Categorical and file-reference cells hold the index of their string in the
/// owning dimension's [`Domain::Values`], which keeps rows `Copy` and makes
/// set membership a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Category(u32),
}

impl Value {
    pub fn as_number(self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n),
            Value::Category(_) => None,
        }
    }

    pub fn as_category(self) -> Option<u32> {
        match self {
            Value::Category(id) => Some(id),
            Value::Number(_) => None,
        }
    }
}

/// Fixed-width row; `values[d]` belongs to dimension `d`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, dim: DimIndex) -> Option<Value> {
        self.values.get(dim).copied()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

const IMAGE_EXTENSIONS: [&str; 4] = ["JPG", "JPEG", "PNG", "GIF"];

/// Extension after the last `.`, with trailing whitespace removed.
pub fn file_extension(path: &str) -> Option<&str> {
    path.rfind('.').map(|i| path[i + 1..].trim_end())
}

/// Whether a file-reference value points at something the image panel can show.
pub fn is_image_file(path: &str) -> bool {
    match file_extension(path) {
        Some(ext) => {
            let ext = ext.trim();
            IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext))
        }
        None => false,
    }
}

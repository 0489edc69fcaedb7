//! Session configuration.
//!
//! Plain serde types; reading and writing TOML is left to the caller.

use serde::{Deserialize, Serialize};

use crate::ordering::{OrderingError, PageSize, SortDirection};
use crate::query::{QueryError, Tolerance};
use crate::registry::{FileRule, SchemaError, DEFAULT_FILE_PATTERN};
use crate::scale::ChartGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub results: ResultsConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Draw paths as smooth curves
    #[serde(default)]
    pub smooth_paths: bool,

    /// Chart width in pixels, margins included
    #[serde(default = "default_width")]
    pub width: f64,

    /// Chart height in pixels, margins included
    #[serde(default = "default_height")]
    pub height: f64,

    #[serde(default = "default_margin")]
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Similarity tolerance, 0 to 100
    #[serde(default = "default_tolerance")]
    pub tolerance_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Dimension to sort results by; the first dimension when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_dimension: Option<String>,

    #[serde(default)]
    pub sort_direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Regex over dimension names marking file-reference columns; empty disables it
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
}

fn default_width() -> f64 { 960.0 }
fn default_height() -> f64 { 500.0 }
fn default_margin() -> f64 { 30.0 }
fn default_tolerance() -> f64 { 10.0 }
fn default_page_size() -> usize { 10 }
fn default_file_pattern() -> String { DEFAULT_FILE_PATTERN.to_string() }

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            smooth_paths: false,
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            tolerance_percent: default_tolerance(),
        }
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_dimension: None,
            sort_direction: SortDirection::Ascending,
        }
    }
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            file_pattern: default_file_pattern(),
        }
    }
}

impl ViewConfig {
    /// Drawable area inside the margins.
    pub fn geometry(&self) -> ChartGeometry {
        ChartGeometry::new(
            (self.width - 2.0 * self.margin).max(0.0),
            (self.height - 2.0 * self.margin).max(0.0),
        )
    }
}

impl QueryConfig {
    pub fn tolerance(&self) -> Result<Tolerance, QueryError> {
        Tolerance::new(self.tolerance_percent)
    }
}

impl ResultsConfig {
    pub fn page_size(&self) -> Result<PageSize, OrderingError> {
        PageSize::new(self.page_size)
    }
}

impl ClassifyConfig {
    pub fn file_rule(&self) -> Result<FileRule, SchemaError> {
        if self.file_pattern.is_empty() {
            Ok(FileRule::disabled())
        } else {
            FileRule::new(&self.file_pattern)
        }
    }
}

//! Similarity queries against a user-drawn path.
//!
//! A [`QueryPath`] assigns target values to some numeric dimensions. The
//! tolerance percentage is split evenly across the engaged dimensions, and
//! each engaged dimension's share is the full width of its band as a
//! percentage of the domain span: `target ± span * share / 200`, clamped to
//! the domain. A row is similar when it falls inside every band.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::Database;
use crate::types::{DimIndex, DimensionKind, RowIndex};

/// Slack applied to band edges so that exact matches survive rounding.
const BAND_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("query path has no target values")]
    EmptyQuery,
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),
    #[error("dimension '{0}' is not numeric and cannot be queried")]
    NotNumeric(String),
    #[error("tolerance must be between 0 and 100, got {0}")]
    ToleranceOutOfRange(f64),
    #[error("slider position must be between 0 and 100, got {0}")]
    SliderOutOfRange(f64),
    #[error("query target for '{dimension}' must be a finite number, got {value}")]
    NonFiniteTarget { dimension: String, value: f64 },
}

/// Sparse map from numeric dimension name to target value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPath {
    targets: BTreeMap<String, f64>,
}

impl QueryPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, dimension: impl Into<String>, value: f64) {
        self.targets.insert(dimension.into(), value);
    }

    pub fn remove(&mut self, dimension: &str) -> Option<f64> {
        self.targets.remove(dimension)
    }

    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.targets.get(dimension).copied()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Number of engaged dimensions.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &BTreeMap<String, f64> {
        &self.targets
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for QueryPath {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Tolerance percentage, validated to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Tolerance(f64);

impl Tolerance {
    pub fn new(percent: f64) -> Result<Self, QueryError> {
        if (0.0..=100.0).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(QueryError::ToleranceOutOfRange(percent))
        }
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    /// Share of the tolerance each of `engaged` dimensions receives.
    pub fn share(self, engaged: usize) -> f64 {
        if engaged == 0 {
            0.0
        } else {
            self.0 / engaged as f64
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(10.0)
    }
}

/// Accepted interval for one engaged dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub dimension: DimIndex,
    pub name: String,
    pub target: f64,
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    fn contains(&self, value: f64, slack: f64) -> bool {
        value >= self.lo - slack && value <= self.hi + slack
    }
}

/// Reject NaN and infinite targets, which would otherwise widen a band to
/// the whole domain.
pub fn check_target(dimension: &str, value: f64) -> Result<(), QueryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(QueryError::NonFiniteTarget {
            dimension: dimension.to_string(),
            value,
        })
    }
}

/// Compute the clamped tolerance band of every engaged dimension.
///
/// An empty query yields no bands; callers that need at least one engaged
/// dimension check that themselves.
pub fn tolerance_bands(query: &QueryPath, tolerance: Tolerance, db: &Database) -> Result<Vec<Band>, QueryError> {
    let share = tolerance.share(query.len());
    query
        .targets()
        .iter()
        .map(|(name, &target)| {
            let dim = db
                .dimension_index(name)
                .ok_or_else(|| QueryError::UnknownDimension(name.clone()))?;
            let dimension = &db.dimensions()[dim];
            let (min, max) = match (dimension.kind, dimension.numeric_range()) {
                (DimensionKind::Numeric, Some(range)) => range,
                _ => return Err(QueryError::NotNumeric(name.clone())),
            };
            check_target(name, target)?;
            // share is the whole band width, split around the target
            let diff = (max - min).abs() * (share / 200.0);
            Ok(Band {
                dimension: dim,
                name: name.clone(),
                target,
                lo: (target - diff).max(min),
                hi: (target + diff).min(max),
            })
        })
        .collect()
}

/// Rows whose engaged-dimension values all lie within their bands.
///
/// No matches is an empty vector, not an error. Fails with
/// [`QueryError::EmptyQuery`] when no dimension is engaged.
pub fn find_similar(query: &QueryPath, tolerance: Tolerance, db: &Database) -> Result<Vec<RowIndex>, QueryError> {
    if query.is_empty() {
        return Err(QueryError::EmptyQuery);
    }
    let bands = tolerance_bands(query, tolerance, db)?;
    let slack: Vec<f64> = bands
        .iter()
        .map(|band| {
            let span = db.dimensions()[band.dimension].domain.span();
            BAND_EPSILON * span.max(1.0)
        })
        .collect();

    let matches: Vec<RowIndex> = db
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            bands.iter().zip(&slack).all(|(band, &eps)| {
                row.get(band.dimension)
                    .and_then(|v| v.as_number())
                    .is_some_and(|v| band.contains(v, eps))
            })
        })
        .map(|(i, _)| i)
        .collect();

    if matches.is_empty() {
        log::warn!("No rows within {}% of the query path", tolerance.percent());
    } else {
        log::debug!(
            "Similarity query over {} dimensions matched {} of {} rows",
            bands.len(),
            matches.len(),
            db.len()
        );
    }
    Ok(matches)
}

/// How an overlay path is meant to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyle {
    /// The user-drawn query path (dashed).
    Custom,
    LowerBound,
    UpperBound,
}

/// Value map drawn on top of the data paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPath {
    pub values: BTreeMap<String, f64>,
    pub style: OverlayStyle,
    pub visible: bool,
}

impl OverlayPath {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            values: BTreeMap::new(),
            style,
            visible: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lower and upper bound paths around a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub lower: OverlayPath,
    pub upper: OverlayPath,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            lower: OverlayPath::new(OverlayStyle::LowerBound),
            upper: OverlayPath::new(OverlayStyle::UpperBound),
        }
    }
}

/// Band edges of every engaged dimension as two overlay paths.
///
/// Dimensions without a target are left out of both paths so that the
/// projector interpolates across them.
pub fn compute_envelope(query: &QueryPath, tolerance: Tolerance, db: &Database) -> Result<Envelope, QueryError> {
    let mut envelope = Envelope::default();
    for band in tolerance_bands(query, tolerance, db)? {
        envelope.lower.values.insert(band.name.clone(), band.lo);
        envelope.upper.values.insert(band.name, band.hi);
    }
    Ok(envelope)
}

/// Map a 0–100 slider position onto a numeric dimension's domain.
pub fn slider_to_value(db: &Database, dimension: &str, position: f64) -> Result<f64, QueryError> {
    if !(0.0..=100.0).contains(&position) {
        return Err(QueryError::SliderOutOfRange(position));
    }
    let dim = db
        .dimension_by_name(dimension)
        .ok_or_else(|| QueryError::UnknownDimension(dimension.to_string()))?;
    let (min, max) = dim
        .numeric_range()
        .ok_or_else(|| QueryError::NotNumeric(dimension.to_string()))?;
    Ok(min + (max - min) * position / 100.0)
}

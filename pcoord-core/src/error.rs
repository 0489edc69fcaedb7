//! Crate-wide error type.

use thiserror::Error;

use crate::axis_order::AxisOrderError;
use crate::brush::BrushError;
use crate::ordering::OrderingError;
use crate::query::QueryError;
use crate::registry::SchemaError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Brush(#[from] BrushError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    AxisOrder(#[from] AxisOrderError),
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),
    #[error("row {0} is out of range")]
    RowOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

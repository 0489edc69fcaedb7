//! pcoord core library
//!
//! Dimension classification, axis scales, path projection, brushing,
//! similarity queries and result ordering for parallel-coordinates views of
//! cinema databases.

pub mod types;
pub mod registry;
pub mod database;
pub mod scale;
pub mod axis_order;
pub mod projector;
pub mod brush;
pub mod query;
pub mod ordering;
pub mod events;
pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types and functions
pub use types::{DimIndex, Dimension, DimensionKind, Domain, Row, RowIndex, Value};
pub use registry::{classify, FileRule, RawRow, SchemaError};
pub use database::Database;
pub use scale::{AxisScale, ChartGeometry, ScaleSet};
pub use axis_order::{AxisOrder, AxisOrderError, AxisOrderings};
pub use projector::{project, project_overlay, ProjectedPath, Vertex};
pub use brush::{recompute_selection, Brush, BrushError, BrushSet, BrushTransition, SelectionEngine};
pub use query::{compute_envelope, find_similar, Envelope, OverlayPath, QueryError, QueryPath, Tolerance};
pub use ordering::{page_buttons, paginate, sort, OrderingError, PageButton, PageSize, SortDirection};
pub use events::{Event, EventKind, ListenerId};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use session::{SelectionStats, Session};

/// Version information for the pcoord core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

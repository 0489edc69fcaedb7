//! Per-axis brushes and the selection intersection pass.
//!
//! Each axis brush moves through `Inactive -> Active -> Inactive`. A drag
//! activates it with a degenerate range, every drag step widens or narrows the
//! range, and releasing it either commits the range or, for a click that did
//! not really move and produced nothing to filter on, clears it.
//!
//! The selection is recomputed from scratch on every change. This is the hot
//! path during continuous drags, so [`SelectionEngine`] keeps its buffers
//! between passes and does not allocate once they are warm.

use thiserror::Error;

use crate::database::Database;
use crate::scale::AxisScale;
use crate::types::{DimIndex, Dimension, DimensionKind, RowIndex, Value};

/// Releasing a drag shorter than this many pixels counts as a click.
pub const CLICK_EPSILON_PX: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum BrushError {
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),
    #[error("dimension '{0}' references files and cannot be brushed")]
    NotBrushable(String),
    #[error("brush kind does not match dimension '{0}'")]
    KindMismatch(String),
    #[error("'{value}' is not a value of dimension '{dimension}'")]
    UnknownCategory { dimension: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    /// Inclusive numeric interval, `lo <= hi`.
    Range { lo: f64, hi: f64 },
    /// Membership flag per category id.
    Categories(Vec<bool>),
}

impl Brush {
    pub fn range(a: f64, b: f64) -> Self {
        Brush::Range {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn categories(ids: &[u32], domain_len: usize) -> Self {
        let mut members = vec![false; domain_len];
        for &id in ids {
            if let Some(slot) = members.get_mut(id as usize) {
                *slot = true;
            }
        }
        Brush::Categories(members)
    }

    /// Categorical brush from value names.
    pub fn from_values<S: AsRef<str>>(dimension: &Dimension, values: &[S]) -> Result<Self, BrushError> {
        let mut ids = Vec::with_capacity(values.len());
        for value in values {
            let value = value.as_ref();
            let id = dimension.domain.category_id(value).ok_or_else(|| BrushError::UnknownCategory {
                dimension: dimension.name.clone(),
                value: value.to_string(),
            })?;
            ids.push(id);
        }
        Ok(Self::categories(&ids, dimension.categories().len()))
    }

    #[inline]
    pub fn contains(&self, value: Value) -> bool {
        match (self, value) {
            (Brush::Range { lo, hi }, Value::Number(n)) => n >= *lo && n <= *hi,
            (Brush::Categories(members), Value::Category(id)) => {
                members.get(id as usize).copied().unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Zero-width range or no category picked.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Brush::Range { lo, hi } => lo == hi,
            Brush::Categories(members) => !members.iter().any(|m| *m),
        }
    }

    fn matches_kind(&self, kind: DimensionKind) -> bool {
        matches!(
            (self, kind),
            (Brush::Range { .. }, DimensionKind::Numeric)
                | (Brush::Categories(_), DimensionKind::Categorical)
        )
    }

    /// Brush covering the data between two pixel positions on an axis.
    pub fn from_pixels(scale: &AxisScale, a: f64, b: f64) -> Self {
        match scale {
            AxisScale::Linear { .. } => {
                let (lo, hi) = scale.invert_span(a, b).unwrap_or((0.0, 0.0));
                Brush::Range { lo, hi }
            }
            AxisScale::Point { count, .. } => Brush::categories(&scale.categories_in_span(a, b), *count),
        }
    }
}

/// Pixel extent of a drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSpan {
    pub anchor: f64,
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BrushState {
    #[default]
    Inactive,
    Active {
        brush: Brush,
        drag: Option<DragSpan>,
    },
}

/// What a brush interaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushTransition {
    Started,
    Moved,
    Committed,
    Cleared,
    /// Event did not apply, e.g. a move without a drag in progress.
    Ignored,
}

impl BrushTransition {
    pub fn changed(self) -> bool {
        !matches!(self, BrushTransition::Ignored)
    }
}

/// Brush state for every axis of a database.
#[derive(Debug, Clone)]
pub struct BrushSet {
    states: Vec<BrushState>,
    kinds: Vec<DimensionKind>,
    names: Vec<String>,
}

impl BrushSet {
    pub fn new(db: &Database) -> Self {
        Self {
            states: vec![BrushState::Inactive; db.dimension_count()],
            kinds: db.dimensions().iter().map(|d| d.kind).collect(),
            names: db.dimensions().iter().map(|d| d.name.clone()).collect(),
        }
    }

    pub fn state(&self, dim: DimIndex) -> Option<&BrushState> {
        self.states.get(dim)
    }

    #[inline]
    pub fn brush(&self, dim: DimIndex) -> Option<&Brush> {
        match self.states.get(dim) {
            Some(BrushState::Active { brush, .. }) => Some(brush),
            _ => None,
        }
    }

    pub fn is_active(&self, dim: DimIndex) -> bool {
        self.brush(dim).is_some()
    }

    /// Dimensions with an active brush, in column order.
    pub fn active_dimensions(&self) -> impl Iterator<Item = DimIndex> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, BrushState::Active { .. }))
            .map(|(d, _)| d)
    }

    pub fn any_active(&self) -> bool {
        self.active_dimensions().next().is_some()
    }

    fn check_brushable(&self, dim: DimIndex) -> Result<(), BrushError> {
        match self.kinds.get(dim) {
            None => Err(BrushError::UnknownDimension(format!("#{dim}"))),
            Some(DimensionKind::FileReference) => Err(BrushError::NotBrushable(self.names[dim].clone())),
            Some(_) => Ok(()),
        }
    }

    /// Set a brush directly, bypassing the drag state machine.
    pub fn set(&mut self, dim: DimIndex, brush: Brush) -> Result<(), BrushError> {
        self.check_brushable(dim)?;
        if !brush.matches_kind(self.kinds[dim]) {
            return Err(BrushError::KindMismatch(self.names[dim].clone()));
        }
        self.states[dim] = BrushState::Active { brush, drag: None };
        Ok(())
    }

    /// Returns whether there was a brush to clear.
    pub fn clear(&mut self, dim: DimIndex) -> bool {
        match self.states.get_mut(dim) {
            Some(state) if matches!(state, BrushState::Active { .. }) => {
                *state = BrushState::Inactive;
                true
            }
            _ => false,
        }
    }

    pub fn clear_all(&mut self) -> bool {
        let mut any = false;
        for dim in 0..self.states.len() {
            any |= self.clear(dim);
        }
        any
    }

    pub fn drag_start(&mut self, dim: DimIndex, px: f64, scale: &AxisScale) -> Result<BrushTransition, BrushError> {
        self.check_brushable(dim)?;
        self.states[dim] = BrushState::Active {
            brush: Brush::from_pixels(scale, px, px),
            drag: Some(DragSpan { anchor: px, current: px }),
        };
        Ok(BrushTransition::Started)
    }

    pub fn drag_move(&mut self, dim: DimIndex, px: f64, scale: &AxisScale) -> Result<BrushTransition, BrushError> {
        self.check_brushable(dim)?;
        let Some(span) = self.drag_span(dim) else {
            return Ok(BrushTransition::Ignored);
        };
        let span = DragSpan { current: px, ..span };
        self.states[dim] = BrushState::Active {
            brush: Brush::from_pixels(scale, span.anchor, span.current),
            drag: Some(span),
        };
        Ok(BrushTransition::Moved)
    }

    pub fn drag_end(&mut self, dim: DimIndex, px: f64, scale: &AxisScale) -> Result<BrushTransition, BrushError> {
        self.check_brushable(dim)?;
        let Some(span) = self.drag_span(dim) else {
            return Ok(BrushTransition::Ignored);
        };
        let brush = Brush::from_pixels(scale, span.anchor, px);
        if brush.is_degenerate() && (px - span.anchor).abs() < CLICK_EPSILON_PX {
            self.states[dim] = BrushState::Inactive;
            return Ok(BrushTransition::Cleared);
        }
        self.states[dim] = BrushState::Active { brush, drag: None };
        Ok(BrushTransition::Committed)
    }

    fn drag_span(&self, dim: DimIndex) -> Option<DragSpan> {
        match self.states.get(dim) {
            Some(BrushState::Active { drag: Some(span), .. }) => Some(*span),
            _ => None,
        }
    }
}

/// Full intersection pass into `out`, using `active` as scratch space.
///
/// `out` receives every row index, in database order, whose value lies in the
/// brush of each brushed dimension. With no brush active every row matches.
pub fn recompute_selection(
    brushes: &BrushSet,
    db: &Database,
    active: &mut Vec<DimIndex>,
    out: &mut Vec<RowIndex>,
) {
    active.clear();
    active.extend(brushes.active_dimensions());
    out.clear();

    if active.is_empty() {
        out.extend(0..db.len());
        return;
    }

    for (i, row) in db.rows().iter().enumerate() {
        let keep = active.iter().all(|&dim| match (brushes.brush(dim), row.get(dim)) {
            (Some(brush), Some(value)) => brush.contains(value),
            _ => false,
        });
        if keep {
            out.push(i);
        }
    }
}

/// Current selection plus the buffers used to recompute it.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    current: Option<Vec<RowIndex>>,
    next: Vec<RowIndex>,
    active: Vec<DimIndex>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first pass has run.
    pub fn selection(&self) -> Option<&[RowIndex]> {
        self.current.as_deref()
    }

    pub fn is_computed(&self) -> bool {
        self.current.is_some()
    }

    /// Recompute from brushes; returns whether the selection changed.
    pub fn recompute(&mut self, brushes: &BrushSet, db: &Database) -> bool {
        recompute_selection(brushes, db, &mut self.active, &mut self.next);
        log::debug!(
            "Selection pass over {} rows with {} brushes: {} selected",
            db.len(),
            self.active.len(),
            self.next.len()
        );
        self.swap_in()
    }

    /// Replace the selection with an explicit set of rows.
    pub fn replace(&mut self, rows: &[RowIndex]) -> bool {
        self.next.clear();
        self.next.extend_from_slice(rows);
        self.next.sort_unstable();
        self.next.dedup();
        self.swap_in()
    }

    fn swap_in(&mut self) -> bool {
        match &mut self.current {
            Some(current) if *current == self.next => false,
            Some(current) => {
                std::mem::swap(current, &mut self.next);
                true
            }
            None => {
                self.current = Some(std::mem::take(&mut self.next));
                true
            }
        }
    }

    /// Forget the selection, e.g. after the database was replaced.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

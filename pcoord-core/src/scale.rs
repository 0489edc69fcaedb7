//! Axis scales: data value <-> pixel mappings.
//!
//! Each dimension gets a vertical [`AxisScale`]; the horizontal placement of the
//! axes themselves is an [`AxisLayout`]. Rebuilding for a new chart size only
//! swaps pixel ranges, domains are never recomputed.

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::types::{DimIndex, Dimension, Domain, Value};

/// Pixel interval a scale maps onto. `start` may exceed `end`, which is how
/// vertical axes put large values at the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: f64,
    pub end: f64,
}

impl PixelRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn extent(&self) -> f64 {
        self.end - self.start
    }

    fn lerp(&self, t: f64) -> f64 {
        self.start + self.extent() * t
    }

    /// Fraction of the way from `start` to `end`; 0.5 for an empty range.
    fn fraction(&self, px: f64) -> f64 {
        if self.extent() == 0.0 {
            0.5
        } else {
            (px - self.start) / self.extent()
        }
    }
}

/// Chart area in pixels, margins already applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
}

impl ChartGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn vertical(&self) -> PixelRange {
        PixelRange::new(self.height, 0.0)
    }

    pub fn horizontal(&self) -> PixelRange {
        PixelRange::new(0.0, self.width)
    }
}

/// Data-space result of inverting a pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inverted {
    Number(f64),
    Category(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    /// `[min, max]` onto the range; a degenerate domain maps to the midpoint.
    Linear { min: f64, max: f64, range: PixelRange },
    /// `count` evenly spaced points, first-seen order.
    Point { count: usize, range: PixelRange },
}

impl AxisScale {
    pub fn build(dimension: &Dimension, range: PixelRange) -> Self {
        match &dimension.domain {
            Domain::Range { min, max } => AxisScale::Linear {
                min: *min,
                max: *max,
                range,
            },
            Domain::Values(values) => AxisScale::Point {
                count: values.len(),
                range,
            },
        }
    }

    pub fn range(&self) -> PixelRange {
        match self {
            AxisScale::Linear { range, .. } | AxisScale::Point { range, .. } => *range,
        }
    }

    /// Same domain, new pixel range.
    pub fn rescale(&mut self, new_range: PixelRange) {
        match self {
            AxisScale::Linear { range, .. } | AxisScale::Point { range, .. } => *range = new_range,
        }
    }

    pub fn map(&self, value: Value) -> f64 {
        match value {
            Value::Number(n) => self.map_number(n),
            Value::Category(id) => self.map_category(id),
        }
    }

    /// Position of a numeric value. Values outside the domain extrapolate.
    pub fn map_number(&self, value: f64) -> f64 {
        match self {
            AxisScale::Linear { min, max, range } => {
                if min == max {
                    range.midpoint()
                } else {
                    range.lerp((value - min) / (max - min))
                }
            }
            AxisScale::Point { range, .. } => range.midpoint(),
        }
    }

    pub fn map_category(&self, id: u32) -> f64 {
        match self {
            AxisScale::Point { count, range } => point_position(*count, range, id as usize),
            AxisScale::Linear { range, .. } => range.midpoint(),
        }
    }

    /// Pixel back to data space. Categorical axes snap to the nearest point.
    pub fn invert(&self, px: f64) -> Inverted {
        match self {
            AxisScale::Linear { min, max, range } => {
                if min == max {
                    Inverted::Number(*min)
                } else {
                    Inverted::Number(min + (max - min) * range.fraction(px))
                }
            }
            AxisScale::Point { count, range } => {
                let last = count.saturating_sub(1);
                let slot = if last == 0 {
                    0.0
                } else {
                    (range.fraction(px) * last as f64).round()
                };
                Inverted::Category(slot.clamp(0.0, last as f64) as u32)
            }
        }
    }

    /// Numeric interval covered by two pixel positions, lower bound first.
    pub fn invert_span(&self, a: f64, b: f64) -> Option<(f64, f64)> {
        match (self.invert(a), self.invert(b)) {
            (Inverted::Number(x), Inverted::Number(y)) => Some((x.min(y), x.max(y))),
            _ => None,
        }
    }

    /// Categories whose points fall between two pixel positions, inclusive.
    pub fn categories_in_span(&self, a: f64, b: f64) -> Vec<u32> {
        match self {
            AxisScale::Point { count, range } => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                (0..*count)
                    .filter(|&i| {
                        let p = point_position(*count, range, i);
                        p >= lo && p <= hi
                    })
                    .map(|i| i as u32)
                    .collect()
            }
            AxisScale::Linear { .. } => Vec::new(),
        }
    }

    /// Roughly `target` round-numbered tick values within the domain.
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        match self {
            AxisScale::Linear { min, max, .. } => linear_ticks(*min, *max, target.max(1)),
            AxisScale::Point { count, .. } => (0..*count).map(|i| i as f64).collect(),
        }
    }
}

fn point_position(count: usize, range: &PixelRange, index: usize) -> f64 {
    if count <= 1 {
        range.midpoint()
    } else {
        range.lerp(index as f64 / (count - 1) as f64)
    }
}

/// Smallest of 1, 2, 5, 10 times a power of ten that covers `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.abs().log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= raw.abs())
        .unwrap_or(10.0 * magnitude)
}

fn linear_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        return vec![lo];
    }
    let step = nice_step((hi - lo) / target as f64);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Horizontal placement of axes: evenly spaced slots across the chart width.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    slots: usize,
    range: PixelRange,
}

impl AxisLayout {
    pub fn new(slots: usize, range: PixelRange) -> Self {
        Self { slots, range }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn position(&self, slot: usize) -> f64 {
        point_position(self.slots, &self.range, slot)
    }

    /// Slot nearest to a horizontal pixel, used when an axis is dragged.
    pub fn slot_at(&self, px: f64) -> usize {
        if self.slots <= 1 {
            return 0;
        }
        let last = (self.slots - 1) as f64;
        (self.range.fraction(px) * last).round().clamp(0.0, last) as usize
    }

    pub fn rescale(&mut self, range: PixelRange) {
        self.range = range;
    }
}

/// Every axis scale of a chart plus the horizontal layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSet {
    axes: Vec<AxisScale>,
    layout: AxisLayout,
    geometry: ChartGeometry,
}

impl ScaleSet {
    /// One vertical scale per dimension, indexed like the database columns.
    pub fn build(db: &Database, geometry: ChartGeometry) -> Self {
        let vertical = geometry.vertical();
        let axes = db
            .dimensions()
            .iter()
            .map(|dim| AxisScale::build(dim, vertical))
            .collect();
        Self {
            axes,
            layout: AxisLayout::new(db.dimension_count(), geometry.horizontal()),
            geometry,
        }
    }

    pub fn axis(&self, dim: DimIndex) -> Option<&AxisScale> {
        self.axes.get(dim)
    }

    pub fn layout(&self) -> &AxisLayout {
        &self.layout
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.geometry
    }

    /// Horizontal position of the axis shown in `slot`.
    pub fn axis_x(&self, slot: usize) -> f64 {
        self.layout.position(slot)
    }

    /// New chart size; domains are untouched.
    pub fn resize(&mut self, geometry: ChartGeometry) {
        let vertical = geometry.vertical();
        for axis in &mut self.axes {
            axis.rescale(vertical);
        }
        self.layout.rescale(geometry.horizontal());
        self.geometry = geometry;
    }
}

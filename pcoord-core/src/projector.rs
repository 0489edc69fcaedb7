//! Path projection: rows and overlay paths to chart vertices.
//!
//! The projector only supplies control points. Whether they are joined by
//! straight segments or a smoothed curve is carried as a flag for the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::axis_order::AxisOrder;
use crate::database::Database;
use crate::scale::ScaleSet;
use crate::types::{DimensionKind, Row};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectedPath {
    pub vertices: Vec<Vertex>,
    /// Draw as a smooth curve through the vertices instead of a polyline.
    pub smooth: bool,
}

/// One vertex per axis, in display order.
pub fn project(row: &Row, order: &AxisOrder, scales: &ScaleSet, smooth: bool) -> ProjectedPath {
    let mut vertices = Vec::with_capacity(order.len());
    project_into(row, order, scales, &mut vertices);
    ProjectedPath { vertices, smooth }
}

/// Like [`project`], reusing the caller's buffer.
pub fn project_into(row: &Row, order: &AxisOrder, scales: &ScaleSet, out: &mut Vec<Vertex>) {
    out.clear();
    for (slot, dim) in order.iter().enumerate() {
        let (Some(value), Some(axis)) = (row.get(dim), scales.axis(dim)) else {
            continue;
        };
        out.push(Vertex {
            x: scales.axis_x(slot),
            y: axis.map(value),
        });
    }
}

/// Project a sparse numeric value map.
///
/// Axes without a value (including every non-numeric axis) are filled in by
/// linear interpolation between the nearest defined neighbours. Before the
/// first and after the last defined axis the line through the two nearest
/// defined vertices is extended; with a single defined axis the path is flat.
/// An overlay with no defined axis projects to no vertices.
pub fn project_overlay(
    values: &BTreeMap<String, f64>,
    db: &Database,
    order: &AxisOrder,
    scales: &ScaleSet,
    smooth: bool,
) -> ProjectedPath {
    let known: Vec<Option<f64>> = order
        .iter()
        .map(|dim| {
            let dimension = db.dimension(dim)?;
            if dimension.kind != DimensionKind::Numeric {
                return None;
            }
            let value = values.get(&dimension.name)?;
            scales.axis(dim).map(|axis| axis.map_number(*value))
        })
        .collect();

    let xs: Vec<f64> = (0..known.len()).map(|slot| scales.axis_x(slot)).collect();
    let defined: Vec<usize> = known
        .iter()
        .enumerate()
        .filter_map(|(slot, y)| y.map(|_| slot))
        .collect();

    let (Some(&first), Some(&last)) = (defined.first(), defined.last()) else {
        return ProjectedPath {
            vertices: Vec::new(),
            smooth,
        };
    };

    let point = |slot: usize| (xs[slot], known[slot].unwrap_or_default());
    let mut vertices = Vec::with_capacity(known.len());
    let mut next_defined = 0;

    for slot in 0..known.len() {
        let y = if let Some(y) = known[slot] {
            next_defined += 1;
            y
        } else if slot < first {
            let towards = defined.get(1).copied().unwrap_or(first);
            line_at(point(first), point(towards), xs[slot])
        } else if slot > last {
            let from = if defined.len() > 1 { defined[defined.len() - 2] } else { last };
            line_at(point(from), point(last), xs[slot])
        } else {
            // Strictly between two defined axes.
            let left = defined[next_defined - 1];
            let right = defined[next_defined];
            line_at(point(left), point(right), xs[slot])
        };
        vertices.push(Vertex { x: xs[slot], y });
    }

    ProjectedPath { vertices, smooth }
}

/// Value at `x` on the line through `a` and `b`; flat when they share an x.
fn line_at(a: (f64, f64), b: (f64, f64), x: f64) -> f64 {
    let dx = b.0 - a.0;
    if dx == 0.0 {
        a.1
    } else {
        a.1 + (b.1 - a.1) * (x - a.0) / dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ChartGeometry;
    use crate::types::{Dimension, Domain, Value};

    fn numeric(name: &str) -> Dimension {
        Dimension {
            name: name.into(),
            kind: DimensionKind::Numeric,
            domain: Domain::Range { min: 0.0, max: 100.0 },
        }
    }

    fn fixture() -> (Database, ScaleSet) {
        let dims = vec![
            numeric("a"),
            numeric("b"),
            Dimension {
                name: "c".into(),
                kind: DimensionKind::Categorical,
                domain: Domain::Values(vec!["x".into(), "y".into()]),
            },
            numeric("d"),
        ];
        let rows = vec![Row::new(vec![
            Value::Number(0.0),
            Value::Number(50.0),
            Value::Category(1),
            Value::Number(100.0),
        ])];
        let db = Database::from_parts(dims, rows);
        // 4 axes over 300px: x = 0, 100, 200, 300; y: 0 -> 100, 100 -> 0
        let scales = ScaleSet::build(&db, ChartGeometry::new(300.0, 100.0));
        (db, scales)
    }

    fn ys(path: &ProjectedPath) -> Vec<f64> {
        path.vertices.iter().map(|v| v.y).collect()
    }

    #[test]
    fn test_project_row_follows_axis_order() {
        let (db, scales) = fixture();
        let row = &db.rows()[0];

        let path = project(row, &AxisOrder::identity(4), &scales, false);
        assert_eq!(ys(&path), vec![100.0, 50.0, 0.0, 0.0]);
        assert_eq!(path.vertices[3].x, 300.0);

        let reordered = AxisOrder::from_names(&db, &["d", "c", "b", "a"]).unwrap();
        let path = project(row, &reordered, &scales, true);
        assert_eq!(ys(&path), vec![0.0, 0.0, 50.0, 100.0]);
        assert_eq!(path.vertices[0].x, 0.0);
        assert!(path.smooth);
    }

    #[test]
    fn test_overlay_interpolates_gaps() {
        let (db, scales) = fixture();
        let values: BTreeMap<String, f64> = [("a".to_string(), 0.0), ("d".to_string(), 60.0)].into();
        let path = project_overlay(&values, &db, &AxisOrder::identity(4), &scales, false);
        // a -> y=100 at x=0, d -> y=40 at x=300
        assert_eq!(ys(&path), vec![100.0, 80.0, 60.0, 40.0]);
    }

    #[test]
    fn test_overlay_extrapolates_ends() {
        let (db, scales) = fixture();
        let values: BTreeMap<String, f64> = [("b".to_string(), 50.0)].into();
        let path = project_overlay(&values, &db, &AxisOrder::identity(4), &scales, false);
        assert_eq!(ys(&path), vec![50.0, 50.0, 50.0, 50.0]);

        let order = AxisOrder::from_names(&db, &["c", "a", "b", "d"]).unwrap();
        let values: BTreeMap<String, f64> = [("a".to_string(), 0.0), ("b".to_string(), 10.0)].into();
        let path = project_overlay(&values, &db, &order, &scales, false);
        // y at slots 1, 2 = 100, 90: slope -10 per slot
        assert_eq!(ys(&path), vec![110.0, 100.0, 90.0, 80.0]);
    }

    #[test]
    fn test_empty_overlay() {
        let (db, scales) = fixture();
        let path = project_overlay(&BTreeMap::new(), &db, &AxisOrder::identity(4), &scales, false);
        assert!(path.vertices.is_empty());
    }
}

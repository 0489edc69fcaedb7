//! Paths command implementation - project selected rows and query overlays

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use pcoord_core::query::OverlayStyle;
use pcoord_core::{AxisOrderings, Vertex};

use crate::config::Config;
use crate::DatabaseArgs;

pub struct PathArgs {
    pub brushes: Vec<String>,
    pub targets: Vec<String>,
    /// Comma-separated dimension names
    pub order: Option<String>,
    /// JSON file of named orderings, used with `ordering`
    pub orderings: Option<PathBuf>,
    pub ordering: Option<String>,
    pub smooth: bool,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct Axis<'a> {
    name: &'a str,
    x: f64,
}

#[derive(Debug, Serialize)]
struct RowPath {
    row: usize,
    vertices: Vec<Vertex>,
}

#[derive(Debug, Serialize)]
struct Overlay {
    style: OverlayStyle,
    vertices: Vec<Vertex>,
}

#[derive(Debug, Serialize)]
struct Projection<'a> {
    width: f64,
    height: f64,
    smooth: bool,
    axes: Vec<Axis<'a>>,
    paths: Vec<RowPath>,
    overlays: Vec<Overlay>,
}

pub fn execute(config: &Config, db: DatabaseArgs, args: PathArgs) -> Result<()> {
    let (mut session, _) = super::open_session(config, &db)?;

    if args.width.is_some() || args.height.is_some() {
        let view = &session.config().view;
        let (width, height) = (args.width.unwrap_or(view.width), args.height.unwrap_or(view.height));
        session.resize(width, height);
    }
    if args.smooth {
        session.set_smoothing(true);
    }

    if let Some(order) = &args.order {
        let names: Vec<&str> = order.split(',').map(str::trim).collect();
        session.set_axis_order(&names)?;
    }
    if let (Some(path), Some(name)) = (&args.orderings, &args.ordering) {
        let text = std::fs::read_to_string(path)?;
        let orderings = AxisOrderings::from_json(&text)?;
        session.apply_ordering(&orderings, name)?;
    }

    session.recompute_selection();
    for spec in &args.brushes {
        super::apply_brush(&mut session, spec)?;
    }
    for spec in &args.targets {
        let (dim, value) = super::parse_assignment(spec)?;
        session.set_query_target(&dim, value)?;
    }

    let limit = args.limit.unwrap_or(usize::MAX);
    let paths = session
        .ordered_selection()
        .iter()
        .take(limit)
        .map(|&row| {
            Ok(RowPath {
                row,
                vertices: session.project_row(row)?.vertices,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let overlays = session
        .project_overlays()
        .into_iter()
        .map(|(style, path)| Overlay {
            style,
            vertices: path.vertices,
        })
        .collect();

    let geometry = session.geometry();
    let projection = Projection {
        width: geometry.width,
        height: geometry.height,
        smooth: session.config().view.smooth_paths,
        axes: session
            .axis_positions()
            .into_iter()
            .map(|(name, x)| Axis { name, x })
            .collect(),
        paths,
        overlays,
    };
    println!("{}", serde_json::to_string_pretty(&projection)?);
    Ok(())
}

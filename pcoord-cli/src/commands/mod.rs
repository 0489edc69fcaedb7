//! Command implementations for the pcoord CLI

pub mod info;
pub mod list;
pub mod paths;
pub mod select;
pub mod show;
pub mod similar;

use anyhow::{Context, Result};
use serde::Serialize;

use pcoord_core::ordering::PageButtonKind;
use pcoord_core::{Brush, DimensionKind, PageButton, Session, SortDirection};

use crate::config::{Config, OutputFormat};
use crate::error::CliError;
use crate::loader::{self, DatabaseSource};
use crate::{DatabaseArgs, ResultArgs};

/// Resolve, read and classify a database, then start a session over it.
pub fn open_session(config: &Config, args: &DatabaseArgs) -> Result<(Session, DatabaseSource)> {
    let source = loader::resolve(&args.db, args.name.as_deref())?;
    log::info!("Opening database '{}' from {}", source.name, source.data.display());
    let table = loader::read_csv_file(&source.data)?;

    let mut session_config = config.session();
    if let Some(pattern) = args.file_pattern.as_ref().or(source.filter.as_ref()) {
        session_config.classify.file_pattern = pattern.clone();
    }
    let session = Session::load(&table.names, &table.rows, session_config)
        .map_err(CliError::from)
        .with_context(|| format!("failed to load database '{}'", source.name))?;
    Ok((session, source))
}

/// Apply `dim=lo:hi`, `dim=value` or `dim=a,b,c` as a brush.
pub fn apply_brush(session: &mut Session, spec: &str) -> Result<()> {
    let (dim, value) = spec
        .split_once('=')
        .ok_or_else(|| CliError::argument(spec, "expected dim=lo:hi or dim=value1,value2"))?;
    let dim = dim.trim();
    let kind = session
        .database()
        .dimension_by_name(dim)
        .map(|d| d.kind)
        .ok_or_else(|| CliError::argument(spec, format!("unknown dimension '{dim}'")))?;

    match kind {
        DimensionKind::Numeric => {
            let (lo, hi) = match value.split_once(':') {
                Some((lo, hi)) => (parse_number(spec, lo)?, parse_number(spec, hi)?),
                None => {
                    let v = parse_number(spec, value)?;
                    (v, v)
                }
            };
            session.set_brush(dim, Brush::range(lo, hi))?;
        }
        DimensionKind::Categorical | DimensionKind::FileReference => {
            let values: Vec<&str> = value.split(',').map(str::trim).collect();
            session.set_brush_values(dim, &values)?;
        }
    }
    Ok(())
}

/// Split `dim=value` into a dimension name and a number.
pub fn parse_assignment(spec: &str) -> Result<(String, f64)> {
    let (dim, value) = spec
        .split_once('=')
        .ok_or_else(|| CliError::argument(spec, "expected dim=value"))?;
    Ok((dim.trim().to_string(), parse_number(spec, value)?))
}

fn parse_number(spec: &str, text: &str) -> Result<f64> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CliError::argument(spec, format!("'{text}' is not a number")).into())
}

/// Sorting and paging flags, applied before the selection is computed.
pub fn configure_results(session: &mut Session, args: &ResultArgs) -> Result<()> {
    if let Some(size) = args.page_size {
        session.set_page_size(size)?;
    }
    if args.sort.is_some() || args.descending {
        let direction = if args.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let dimension = match &args.sort {
            Some(name) => name.clone(),
            None => session.sort().0.to_string(),
        };
        session.set_sort(&dimension, direction)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ResultRow {
    index: usize,
    values: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
struct ResultPage {
    selected: usize,
    total: usize,
    page: usize,
    pages: usize,
    rows: Vec<ResultRow>,
    buttons: Vec<PageButton>,
}

/// Print the requested page of the session's ordered selection.
pub fn print_results(session: &mut Session, args: &ResultArgs, format: OutputFormat) -> Result<()> {
    if let Some(page) = args.page {
        session.set_page(page);
    }
    let stats = session.selection_stats();
    let rows = session
        .current_page_rows()
        .iter()
        .map(|&index| {
            Ok(ResultRow {
                index,
                values: session.row_info(index)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match format {
        OutputFormat::Json => {
            let page = ResultPage {
                selected: stats.selected,
                total: stats.total,
                page: session.page(),
                pages: session.page_count(),
                rows,
                buttons: session.page_buttons(),
            };
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        OutputFormat::Text => {
            println!("{stats}");
            if rows.is_empty() {
                return Ok(());
            }
            let header: Vec<String> = session.axis_names().into_iter().map(String::from).collect();
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    std::iter::once(row.index.to_string())
                        .chain(row.values.iter().map(|(_, v)| v.clone()))
                        .collect()
                })
                .collect();
            print_table(&header, &table);
            println!(
                "Page {} of {}  {}",
                session.page(),
                session.page_count(),
                format_buttons(&session.page_buttons())
            );
        }
    }
    Ok(())
}

fn print_table(header: &[String], rows: &[Vec<String>]) {
    let head: Vec<&str> = std::iter::once("row").chain(header.iter().map(String::as_str)).collect();
    let mut widths: Vec<usize> = head.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    println!("{}", line(head.clone()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

pub fn format_buttons(buttons: &[PageButton]) -> String {
    buttons
        .iter()
        .map(|button| {
            let label = match button.kind {
                PageButtonKind::Page | PageButtonKind::Current => button.target.to_string(),
                PageButtonKind::First => format!("first:{}", button.target),
                PageButtonKind::Previous => format!("prev:{}", button.target),
                PageButtonKind::StepBack => format!("back:{}", button.target),
                PageButtonKind::StepForward => format!("fwd:{}", button.target),
                PageButtonKind::Next => format!("next:{}", button.target),
                PageButtonKind::Last => format!("last:{}", button.target),
            };
            if button.selected {
                format!("[*{label}*]")
            } else {
                format!("[{label}]")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

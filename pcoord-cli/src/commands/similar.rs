//! Similar command implementation - find rows close to a query path

use anyhow::{anyhow, Result};

use crate::config::{Config, OutputFormat};
use crate::{DatabaseArgs, ResultArgs};

pub struct QueryArgs {
    /// `dim=value` targets
    pub targets: Vec<String>,
    /// `dim=position` targets on a 0-100 slider
    pub sliders: Vec<String>,
    pub tolerance: Option<f64>,
}

pub fn execute(
    config: &Config,
    db: DatabaseArgs,
    query: QueryArgs,
    results: ResultArgs,
    format: OutputFormat,
) -> Result<()> {
    let (mut session, _) = super::open_session(config, &db)?;
    super::configure_results(&mut session, &results)?;

    if let Some(tolerance) = query.tolerance {
        session.set_tolerance(tolerance)?;
    }
    for spec in &query.targets {
        let (dim, value) = super::parse_assignment(spec)?;
        session.set_query_target(&dim, value)?;
    }
    for spec in &query.sliders {
        let (dim, position) = super::parse_assignment(spec)?;
        let value = session.set_query_slider(&dim, position)?;
        log::info!("Slider {} at {} maps to {}", dim, position, value);
    }
    for band in session.envelope().lower.values.keys() {
        log::debug!(
            "Band for {}: [{}, {}]",
            band,
            session.envelope().lower.values[band],
            session.envelope().upper.values[band]
        );
    }

    session.recompute_selection();
    let matches = session.find_similar()?;
    if matches.is_empty() {
        return Err(anyhow!(
            "No results found within {}% of the query",
            session.tolerance().percent()
        ));
    }

    super::print_results(&mut session, &results, format)
}

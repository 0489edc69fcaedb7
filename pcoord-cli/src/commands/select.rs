//! Select command implementation - brush axes and list the matching rows

use anyhow::Result;

use crate::config::{Config, OutputFormat};
use crate::{DatabaseArgs, ResultArgs};

pub fn execute(
    config: &Config,
    db: DatabaseArgs,
    brushes: Vec<String>,
    results: ResultArgs,
    format: OutputFormat,
) -> Result<()> {
    let (mut session, _) = super::open_session(config, &db)?;
    super::configure_results(&mut session, &results)?;

    session.recompute_selection();
    for spec in &brushes {
        super::apply_brush(&mut session, spec)?;
    }
    log::info!("{}", session.selection_stats());

    super::print_results(&mut session, &results, format)
}

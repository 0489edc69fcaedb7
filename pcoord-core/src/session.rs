//! Interactive session over one loaded database.
//!
//! The session owns everything that changes while a user works with a
//! chart: brushes, the axis order, the query path and tolerance, sorting and
//! paging of the results. Every mutation recomputes synchronously and
//! notifies listeners before returning.

use std::fmt;

use crate::axis_order::{AxisOrder, AxisOrderings};
use crate::brush::{Brush, BrushError, BrushSet, BrushTransition, SelectionEngine};
use crate::config::SessionConfig;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::events::{Dispatcher, Event, EventKind, ListenerId};
use crate::ordering::{self, PageButton, PageSize, SortDirection};
use crate::projector::{self, ProjectedPath};
use crate::query::{self, Envelope, OverlayPath, OverlayStyle, QueryError, QueryPath, Tolerance};
use crate::registry::RawRow;
use crate::scale::{AxisScale, ChartGeometry, ScaleSet};
use crate::types::{DimIndex, DimensionKind, RowIndex};

/// "N out of M results selected".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStats {
    pub selected: usize,
    pub total: usize,
}

impl fmt::Display for SelectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {} results selected", self.selected, self.total)
    }
}

pub struct Session {
    db: Database,
    config: SessionConfig,
    scales: ScaleSet,
    order: AxisOrder,
    brushes: BrushSet,
    selection: SelectionEngine,
    query: QueryPath,
    tolerance: Tolerance,
    envelope: Envelope,
    page_size: PageSize,
    sort_dimension: DimIndex,
    sort_direction: SortDirection,
    /// Selection in display order.
    ordered: Vec<RowIndex>,
    page: usize,
    highlight: Option<RowIndex>,
    dispatcher: Dispatcher,
}

impl Session {
    /// Start a session. The selection stays "not computed" until the first
    /// call to [`Session::recompute_selection`] or a brush interaction.
    pub fn new(db: Database, config: SessionConfig) -> Result<Self> {
        let tolerance = config.query.tolerance()?;
        let page_size = config.results.page_size()?;
        let sort_dimension = match &config.results.sort_dimension {
            Some(name) => db
                .dimension_index(name)
                .ok_or_else(|| Error::UnknownDimension(name.clone()))?,
            None => 0,
        };
        let scales = ScaleSet::build(&db, config.view.geometry());

        Ok(Self {
            order: AxisOrder::identity(db.dimension_count()),
            brushes: BrushSet::new(&db),
            selection: SelectionEngine::new(),
            query: QueryPath::new(),
            tolerance,
            envelope: Envelope::default(),
            page_size,
            sort_dimension,
            sort_direction: config.results.sort_direction,
            ordered: Vec::new(),
            page: 1,
            highlight: None,
            dispatcher: Dispatcher::new(),
            scales,
            db,
            config,
        })
    }

    /// Classify raw records with the configured file rule and start a session.
    pub fn load(names: &[String], raw: &[RawRow], config: SessionConfig) -> Result<Self> {
        let rule = config.classify.file_rule()?;
        let db = Database::load(names, raw, &rule)?;
        Self::new(db, config)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.dispatcher.on(kind, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.dispatcher.off(id)
    }

    // Selection

    /// `None` until the selection has been computed once.
    pub fn selection(&self) -> Option<&[RowIndex]> {
        self.selection.selection()
    }

    /// Run the intersection pass now and return the result.
    pub fn recompute_selection(&mut self) -> &[RowIndex] {
        self.refresh_selection();
        self.selection.selection().unwrap_or_default()
    }

    pub fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    pub fn brush_start(&mut self, dimension: &str, px: f64) -> Result<BrushTransition> {
        self.drag(dimension, px, BrushSet::drag_start)
    }

    pub fn brush_move(&mut self, dimension: &str, px: f64) -> Result<BrushTransition> {
        self.drag(dimension, px, BrushSet::drag_move)
    }

    pub fn brush_end(&mut self, dimension: &str, px: f64) -> Result<BrushTransition> {
        self.drag(dimension, px, BrushSet::drag_end)
    }

    fn drag<F>(&mut self, dimension: &str, px: f64, step: F) -> Result<BrushTransition>
    where
        F: FnOnce(&mut BrushSet, DimIndex, f64, &AxisScale) -> std::result::Result<BrushTransition, BrushError>,
    {
        let dim = self.brush_dimension(dimension)?;
        let scale = self
            .scales
            .axis(dim)
            .ok_or_else(|| BrushError::UnknownDimension(dimension.to_string()))?;
        let transition = step(&mut self.brushes, dim, px, scale)?;
        if transition.changed() {
            self.refresh_selection();
        }
        Ok(transition)
    }

    /// Set a brush in data space.
    pub fn set_brush(&mut self, dimension: &str, brush: Brush) -> Result<()> {
        let dim = self.brush_dimension(dimension)?;
        self.brushes.set(dim, brush)?;
        self.refresh_selection();
        Ok(())
    }

    /// Brush a categorical dimension to the given values.
    pub fn set_brush_values<S: AsRef<str>>(&mut self, dimension: &str, values: &[S]) -> Result<()> {
        let dim = self.brush_dimension(dimension)?;
        let brush = Brush::from_values(&self.db.dimensions()[dim], values)?;
        self.brushes.set(dim, brush)?;
        self.refresh_selection();
        Ok(())
    }

    pub fn clear_brush(&mut self, dimension: &str) -> Result<()> {
        let dim = self.brush_dimension(dimension)?;
        if self.brushes.clear(dim) {
            self.refresh_selection();
        }
        Ok(())
    }

    pub fn clear_brushes(&mut self) {
        if self.brushes.clear_all() {
            self.refresh_selection();
        }
    }

    fn brush_dimension(&self, name: &str) -> std::result::Result<DimIndex, BrushError> {
        self.db
            .dimension_index(name)
            .ok_or_else(|| BrushError::UnknownDimension(name.to_string()))
    }

    fn refresh_selection(&mut self) {
        if self.selection.recompute(&self.brushes, &self.db) {
            self.selection_changed();
        }
    }

    fn selection_changed(&mut self) {
        self.page = 1;
        self.resort();
        // the payload copy is only built for someone to receive it
        if self.dispatcher.listener_count(EventKind::SelectionChange) > 0 {
            let selected = self.selection.selection().unwrap_or_default().to_vec();
            self.dispatcher.emit(&Event::SelectionChange(selected));
        }
    }

    fn resort(&mut self) {
        let selected = self.selection.selection().unwrap_or_default();
        ordering::sort_by_dimension(
            selected,
            &self.db,
            self.sort_dimension,
            self.sort_direction,
            &mut self.ordered,
        );
    }

    pub fn selection_stats(&self) -> SelectionStats {
        SelectionStats {
            selected: self.selection.selection().map_or(0, <[RowIndex]>::len),
            total: self.db.len(),
        }
    }

    // Axis order

    pub fn axis_order(&self) -> &AxisOrder {
        &self.order
    }

    pub fn axis_names(&self) -> Vec<&str> {
        self.order.names(&self.db)
    }

    pub fn set_axis_order<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let order = AxisOrder::from_names(&self.db, names)?;
        self.replace_order(order);
        Ok(())
    }

    /// Switch to one of an external dataset's named orderings.
    pub fn apply_ordering(&mut self, orderings: &AxisOrderings, name: &str) -> Result<()> {
        let order = orderings.resolve(name, &self.db)?;
        self.replace_order(order);
        Ok(())
    }

    pub fn move_axis(&mut self, from: usize, to: usize) -> Result<()> {
        let mut order = self.order.clone();
        order.move_axis(from, to)?;
        self.replace_order(order);
        Ok(())
    }

    pub fn reset_axis_order(&mut self) {
        self.replace_order(AxisOrder::identity(self.db.dimension_count()));
    }

    fn replace_order(&mut self, order: AxisOrder) {
        if order == self.order {
            return;
        }
        self.order = order;
        let names: Vec<String> = self.axis_names().into_iter().map(String::from).collect();
        log::info!("Axis order changed to [{}]", names.join(", "));
        self.dispatcher.emit(&Event::AxisOrderChange(names));
    }

    /// Each axis with its horizontal position, in display order.
    pub fn axis_positions(&self) -> Vec<(&str, f64)> {
        self.axis_names()
            .into_iter()
            .enumerate()
            .map(|(slot, name)| (name, self.scales.axis_x(slot)))
            .collect()
    }

    /// Dimension whose axis is closest to a horizontal pixel position.
    pub fn axis_at(&self, px: f64) -> Option<&str> {
        let slot = self.scales.layout().slot_at(px);
        let dim = self.order.as_slice().get(slot)?;
        self.db.dimension(*dim).map(|d| d.name.as_str())
    }

    // View

    pub fn resize(&mut self, width: f64, height: f64) {
        self.config.view.width = width;
        self.config.view.height = height;
        self.scales.resize(self.config.view.geometry());
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.scales.geometry()
    }

    pub fn set_smoothing(&mut self, smooth: bool) {
        self.config.view.smooth_paths = smooth;
    }

    pub fn project_row(&self, row: RowIndex) -> Result<ProjectedPath> {
        let row_data = self.db.row(row).ok_or(Error::RowOutOfRange(row))?;
        Ok(projector::project(
            row_data,
            &self.order,
            &self.scales,
            self.config.view.smooth_paths,
        ))
    }

    /// Visible, non-empty overlays: the query path and its envelope.
    pub fn project_overlays(&self) -> Vec<(OverlayStyle, ProjectedPath)> {
        let custom = self.custom_path();
        [&custom, &self.envelope.lower, &self.envelope.upper]
            .into_iter()
            .filter(|path| path.visible && !path.is_empty())
            .map(|path| {
                let projected = projector::project_overlay(
                    &path.values,
                    &self.db,
                    &self.order,
                    &self.scales,
                    self.config.view.smooth_paths,
                );
                (path.style, projected)
            })
            .collect()
    }

    // Query

    pub fn query(&self) -> &QueryPath {
        &self.query
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn custom_path(&self) -> OverlayPath {
        let mut path = OverlayPath::new(OverlayStyle::Custom);
        path.values = self.query.targets().clone();
        path
    }

    pub fn set_query_target(&mut self, dimension: &str, value: f64) -> Result<()> {
        let dim = self
            .db
            .dimension_by_name(dimension)
            .ok_or_else(|| QueryError::UnknownDimension(dimension.to_string()))?;
        if dim.kind != DimensionKind::Numeric {
            return Err(QueryError::NotNumeric(dimension.to_string()).into());
        }
        query::check_target(dimension, value)?;
        self.query.set(dimension, value);
        self.query_changed()
    }

    /// Set a target from a 0–100 slider position along the dimension's domain.
    pub fn set_query_slider(&mut self, dimension: &str, position: f64) -> Result<f64> {
        let value = query::slider_to_value(&self.db, dimension, position)?;
        self.set_query_target(dimension, value)?;
        Ok(value)
    }

    pub fn clear_query_target(&mut self, dimension: &str) -> Result<()> {
        if self.query.remove(dimension).is_some() {
            self.query_changed()?;
        }
        Ok(())
    }

    pub fn clear_query(&mut self) -> Result<()> {
        if !self.query.is_empty() {
            self.query.clear();
            self.query_changed()?;
        }
        Ok(())
    }

    pub fn set_tolerance(&mut self, percent: f64) -> Result<()> {
        let tolerance = Tolerance::new(percent)?;
        if tolerance != self.tolerance {
            self.tolerance = tolerance;
            self.config.query.tolerance_percent = percent;
            self.query_changed()?;
        }
        Ok(())
    }

    fn query_changed(&mut self) -> Result<()> {
        self.envelope = query::compute_envelope(&self.query, self.tolerance, &self.db)?;
        log::debug!(
            "Query over {} dimensions at {}% tolerance",
            self.query.len(),
            self.tolerance.percent()
        );
        let event = Event::QueryChange {
            upper: self.envelope.upper.clone(),
            lower: self.envelope.lower.clone(),
            custom: self.custom_path(),
        };
        self.dispatcher.emit(&event);
        Ok(())
    }

    /// Rows similar to the query path.
    ///
    /// A non-empty result becomes the selection and clears every brush. An
    /// empty result leaves the selection alone.
    pub fn find_similar(&mut self) -> Result<Vec<RowIndex>> {
        let matches = query::find_similar(&self.query, self.tolerance, &self.db)?;
        if matches.is_empty() {
            return Ok(matches);
        }
        self.brushes.clear_all();
        if self.selection.replace(&matches) {
            self.selection_changed();
        }
        Ok(matches)
    }

    // Results

    /// Selection in display order.
    pub fn ordered_selection(&self) -> &[RowIndex] {
        &self.ordered
    }

    pub fn sort(&self) -> (&str, SortDirection) {
        let name = self
            .db
            .dimension(self.sort_dimension)
            .map(|d| d.name.as_str())
            .unwrap_or_default();
        (name, self.sort_direction)
    }

    pub fn set_sort(&mut self, dimension: &str, direction: SortDirection) -> Result<()> {
        self.sort_dimension = self
            .db
            .dimension_index(dimension)
            .ok_or_else(|| Error::UnknownDimension(dimension.to_string()))?;
        self.sort_direction = direction;
        self.config.results.sort_dimension = Some(dimension.to_string());
        self.config.results.sort_direction = direction;
        self.resort();
        Ok(())
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Changing the page size goes back to the first page.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        self.page_size = PageSize::new(size)?;
        self.config.results.page_size = size;
        self.page = 1;
        Ok(())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        ordering::page_count(self.ordered.len(), self.page_size)
    }

    /// Go to a page, clamped to the valid range; returns the page shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = ordering::clamp_page(self.ordered.len(), self.page_size, page);
        self.page
    }

    pub fn current_page_rows(&self) -> &[RowIndex] {
        ordering::paginate(&self.ordered, self.page_size, self.page)
    }

    pub fn page_buttons(&self) -> Vec<PageButton> {
        ordering::page_buttons(self.ordered.len(), self.page_size, self.page)
    }

    // Highlight and details

    pub fn highlight(&self) -> Option<RowIndex> {
        self.highlight
    }

    /// Mark one row as hovered, or none. Returns whether it changed.
    pub fn set_highlight(&mut self, row: Option<RowIndex>) -> Result<bool> {
        if let Some(index) = row {
            if index >= self.db.len() {
                return Err(Error::RowOutOfRange(index));
            }
        }
        if row == self.highlight {
            return Ok(false);
        }
        self.highlight = row;
        self.dispatcher.emit(&Event::Highlight(row));
        Ok(true)
    }

    /// Dimension name and display value of one row, in axis order.
    pub fn row_info(&self, row: RowIndex) -> Result<Vec<(String, String)>> {
        if row >= self.db.len() {
            return Err(Error::RowOutOfRange(row));
        }
        Ok(self
            .order
            .iter()
            .filter_map(|dim| {
                let name = self.db.dimension(dim)?.name.clone();
                let value = self.db.display_value(row, dim).unwrap_or_default();
                Some((name, value))
            })
            .collect())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("rows", &self.db.len())
            .field("dimensions", &self.db.dimension_count())
            .field("selected", &self.selection.selection().map(<[RowIndex]>::len))
            .field("page", &self.page)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn raw(rows: &[(&str, &str, &str)]) -> (Vec<String>, Vec<RawRow>) {
        let names = vec!["temp".to_string(), "material".to_string(), "FILE".to_string()];
        let raw = rows
            .iter()
            .map(|(t, m, f)| {
                names
                    .iter()
                    .cloned()
                    .zip([t.to_string(), m.to_string(), f.to_string()])
                    .collect()
            })
            .collect();
        (names, raw)
    }

    fn session() -> Session {
        let (names, raw) = raw(&[
            ("0", "steel", "a.png"),
            ("40", "glass", "b.png"),
            ("50", "steel", "c.png"),
            ("60", "glass", "d.png"),
            ("100", "steel", "e.png"),
        ]);
        Session::load(&names, &raw, SessionConfig::default()).unwrap()
    }

    fn recorder(session: &mut Session, kind: EventKind) -> Rc<RefCell<Vec<Event>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        session.on(kind, move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn test_selection_starts_uncomputed() {
        let mut session = session();
        assert_eq!(session.selection(), None);
        assert_eq!(session.recompute_selection(), &[0, 1, 2, 3, 4]);
        assert_eq!(session.selection_stats().to_string(), "5 out of 5 results selected");
    }

    #[test]
    fn test_brush_emits_selection_change() {
        let mut session = session();
        let events = recorder(&mut session, EventKind::SelectionChange);

        session.set_brush_values("material", &["steel"]).unwrap();
        session.set_brush("temp", Brush::range(10.0, 100.0)).unwrap();

        assert_eq!(session.selection(), Some(&[2, 4][..]));
        assert_eq!(
            *events.borrow(),
            vec![
                Event::SelectionChange(vec![0, 2, 4]),
                Event::SelectionChange(vec![2, 4]),
            ]
        );

        // Same brush again: nothing changes, nothing fires.
        session.set_brush("temp", Brush::range(10.0, 100.0)).unwrap();
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_file_dimension_is_not_brushable() {
        let mut session = session();
        let err = session.set_brush_values("FILE", &["a.png"]).unwrap_err();
        assert!(matches!(err, Error::Brush(BrushError::NotBrushable(_))));
        assert!(matches!(
            session.brush_start("nope", 1.0),
            Err(Error::Brush(BrushError::UnknownDimension(_)))
        ));
    }

    #[test]
    fn test_find_similar_replaces_selection() {
        let mut session = session();
        session.set_brush_values("material", &["glass"]).unwrap();
        session.set_query_target("temp", 50.0).unwrap();
        session.set_tolerance(20.0).unwrap();

        assert_eq!(session.find_similar().unwrap(), vec![1, 2, 3]);
        assert_eq!(session.selection(), Some(&[1, 2, 3][..]));
        assert!(!session.brushes().any_active());

        // Nothing near 25 at 2%: the selection stays as it was.
        session.set_query_target("temp", 25.0).unwrap();
        session.set_tolerance(2.0).unwrap();
        assert!(session.find_similar().unwrap().is_empty());
        assert_eq!(session.selection(), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn test_query_change_carries_envelope() {
        let mut session = session();
        session.set_tolerance(20.0).unwrap();
        let events = recorder(&mut session, EventKind::QueryChange);
        session.set_query_target("temp", 50.0).unwrap();

        let first = events.borrow()[0].clone();
        let Event::QueryChange { upper, lower, custom } = first else {
            panic!("expected a query change");
        };
        assert_eq!(lower.values["temp"], 40.0);
        assert_eq!(upper.values["temp"], 60.0);
        assert_eq!(custom.values["temp"], 50.0);

        assert!(matches!(
            session.set_query_target("material", 1.0),
            Err(Error::Query(QueryError::NotNumeric(_)))
        ));
        assert!(matches!(session.find_similar(), Ok(rows) if rows == vec![1, 2, 3]));
    }

    #[test]
    fn test_non_finite_target_leaves_query_alone() {
        let mut session = session();
        session.set_tolerance(0.0).unwrap();
        let events = recorder(&mut session, EventKind::QueryChange);

        assert!(matches!(
            session.set_query_target("temp", f64::NAN),
            Err(Error::Query(QueryError::NonFiniteTarget { .. }))
        ));
        assert!(session.query().is_empty());
        assert!(events.borrow().is_empty());

        session.set_query_target("temp", 60.0).unwrap();
        assert_eq!(session.find_similar().unwrap(), vec![3]);
    }

    #[test]
    fn test_clearing_targets_shrinks_envelope() {
        let names = vec!["temp".to_string(), "pressure".to_string()];
        let raw: Vec<RawRow> = [("0", "1"), ("50", "2"), ("100", "3")]
            .iter()
            .map(|(t, p)| names.iter().cloned().zip([t.to_string(), p.to_string()]).collect())
            .collect();
        let mut session = Session::load(&names, &raw, SessionConfig::default()).unwrap();
        session.set_query_target("temp", 50.0).unwrap();
        session.set_query_target("pressure", 2.0).unwrap();
        let events = recorder(&mut session, EventKind::QueryChange);

        session.clear_query_target("pressure").unwrap();
        assert_eq!(session.query().get("pressure"), None);
        assert!(!session.envelope().lower.values.contains_key("pressure"));
        assert!(session.envelope().upper.values.contains_key("temp"));
        assert_eq!(events.borrow().len(), 1);
        let Event::QueryChange { lower, custom, .. } = events.borrow()[0].clone() else {
            panic!("expected a query change");
        };
        assert!(!lower.values.contains_key("pressure"));
        assert_eq!(custom.values.keys().collect::<Vec<_>>(), vec!["temp"]);

        // Removing a target that is not set is silent.
        session.clear_query_target("pressure").unwrap();
        assert_eq!(events.borrow().len(), 1);

        session.clear_query().unwrap();
        assert!(session.query().is_empty());
        assert!(session.envelope().lower.is_empty() && session.envelope().upper.is_empty());
        assert_eq!(events.borrow().len(), 2);
        assert!(session.project_overlays().is_empty());

        session.clear_query().unwrap();
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_empty_query_is_an_error() {
        let mut session = session();
        assert!(matches!(
            session.find_similar(),
            Err(Error::Query(QueryError::EmptyQuery))
        ));
    }

    #[test]
    fn test_slider_maps_onto_domain() {
        let mut session = session();
        assert_eq!(session.set_query_slider("temp", 50.0).unwrap(), 50.0);
        assert_eq!(session.set_query_slider("temp", 25.0).unwrap(), 25.0);
        assert_eq!(session.query().get("temp"), Some(25.0));
    }

    #[test]
    fn test_axis_order_events() {
        let mut session = session();
        let events = recorder(&mut session, EventKind::AxisOrderChange);

        session.set_axis_order(&["material", "temp", "FILE"]).unwrap();
        session.move_axis(2, 0).unwrap();
        session.set_axis_order(&["FILE", "material", "temp"]).unwrap();

        assert_eq!(session.axis_names(), vec!["FILE", "material", "temp"]);
        assert_eq!(events.borrow().len(), 2);
        assert!(session.set_axis_order(&["temp"]).is_err());
    }

    #[test]
    fn test_axis_at_follows_display_order() {
        let mut session = session();
        let positions: Vec<(String, f64)> = session
            .axis_positions()
            .into_iter()
            .map(|(name, x)| (name.to_string(), x))
            .collect();
        for (name, x) in &positions {
            assert_eq!(session.axis_at(*x), Some(name.as_str()));
        }
        assert_eq!(session.axis_at(-500.0), Some("temp"));
        assert_eq!(session.axis_at(1.0e6), Some("FILE"));

        session.set_axis_order(&["FILE", "temp", "material"]).unwrap();
        assert_eq!(session.axis_at(positions[0].1), Some("FILE"));
        assert_eq!(session.axis_at(positions[2].1), Some("material"));
    }

    #[test]
    fn test_reset_axis_order() {
        let mut session = session();
        let events = recorder(&mut session, EventKind::AxisOrderChange);

        session.reset_axis_order();
        assert!(events.borrow().is_empty());

        session.move_axis(0, 2).unwrap();
        assert_eq!(session.axis_names(), vec!["material", "FILE", "temp"]);
        session.reset_axis_order();
        assert_eq!(session.axis_names(), vec!["temp", "material", "FILE"]);
        assert_eq!(
            events.borrow().last(),
            Some(&Event::AxisOrderChange(vec![
                "temp".to_string(),
                "material".to_string(),
                "FILE".to_string(),
            ]))
        );
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_brush_changes_reuse_result_buffer() {
        let mut session = session();
        session.recompute_selection();
        let buffer = session.ordered_selection().as_ptr();

        session.set_brush("temp", Brush::range(0.0, 60.0)).unwrap();
        session.set_brush("temp", Brush::range(40.0, 60.0)).unwrap();
        assert_eq!(session.ordered_selection(), &[1, 2, 3]);
        assert_eq!(session.ordered_selection().as_ptr(), buffer);
    }

    #[test]
    fn test_paging_resets_on_selection_change() {
        let mut session = session();
        session.recompute_selection();
        session.set_page_size(2).unwrap();
        assert_eq!(session.page_count(), 3);
        assert_eq!(session.set_page(9), 3);
        assert_eq!(session.current_page_rows(), &[4]);

        session.set_brush_values("material", &["steel"]).unwrap();
        assert_eq!(session.page(), 1);
        assert_eq!(session.current_page_rows(), &[0, 2]);
    }

    #[test]
    fn test_sort_descending() {
        let mut session = session();
        session.recompute_selection();
        session.set_sort("temp", SortDirection::Descending).unwrap();
        assert_eq!(session.ordered_selection(), &[4, 3, 2, 1, 0]);
        assert!(session.set_sort("nope", SortDirection::Ascending).is_err());
    }

    #[test]
    fn test_highlight_and_row_info() {
        let mut session = session();
        let events = recorder(&mut session, EventKind::Highlight);

        assert!(session.set_highlight(Some(3)).unwrap());
        assert!(!session.set_highlight(Some(3)).unwrap());
        assert!(session.set_highlight(Some(99)).is_err());
        assert_eq!(*events.borrow(), vec![Event::Highlight(Some(3))]);

        let info = session.row_info(3).unwrap();
        assert_eq!(
            info,
            vec![
                ("temp".to_string(), "60".to_string()),
                ("material".to_string(), "glass".to_string()),
                ("FILE".to_string(), "d.png".to_string()),
            ]
        );
    }

    #[test]
    fn test_resize_keeps_brushes() {
        let mut session = session();
        session.set_brush("temp", Brush::range(40.0, 60.0)).unwrap();
        session.resize(430.0, 260.0);

        assert_eq!(session.geometry(), ChartGeometry::new(370.0, 200.0));
        assert_eq!(session.selection(), Some(&[1, 2, 3][..]));
        let positions: Vec<f64> = session.axis_positions().iter().map(|(_, x)| *x).collect();
        assert_eq!(positions, vec![0.0, 185.0, 370.0]);

        let path = session.project_row(2).unwrap();
        assert_eq!(path.vertices[0].y, 100.0);
    }
}

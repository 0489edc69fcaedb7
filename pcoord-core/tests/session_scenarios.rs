use std::cell::RefCell;
use std::rc::Rc;

use pcoord_core::ordering::{self, PageButtonKind};
use pcoord_core::query::OverlayStyle;
use pcoord_core::{
    BrushTransition, Error, Event, EventKind, PageSize, QueryError, RawRow, SchemaError, Session,
    SessionConfig,
};

fn table(names: &[&str], rows: &[Vec<String>]) -> (Vec<String>, Vec<RawRow>) {
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    let raw = rows
        .iter()
        .map(|cells| names.iter().cloned().zip(cells.iter().cloned()).collect())
        .collect();
    (names, raw)
}

fn experiments() -> Session {
    let rows: Vec<Vec<String>> = [
        (0, "steel", 1.0),
        (35, "glass", 2.0),
        (40, "steel", 3.0),
        (45, "glass", 4.0),
        (50, "steel", 5.0),
        (60, "glass", 4.0),
        (61, "steel", 3.0),
        (100, "glass", 2.0),
    ]
    .iter()
    .enumerate()
    .map(|(i, (temp, material, pressure))| {
        vec![
            temp.to_string(),
            material.to_string(),
            pressure.to_string(),
            format!("images/{i}.png"),
        ]
    })
    .collect();
    let (names, raw) = table(&["temp", "material", "pressure", "FILE_image"], &rows);
    Session::load(&names, &raw, SessionConfig::default()).unwrap()
}

#[test]
fn temp_band_scenario() {
    let mut session = experiments();
    session.set_query_target("temp", 50.0).unwrap();
    session.set_tolerance(20.0).unwrap();

    let band = &session.envelope();
    assert_eq!(band.lower.values["temp"], 40.0);
    assert_eq!(band.upper.values["temp"], 60.0);
    assert_eq!(session.find_similar().unwrap(), vec![2, 3, 4, 5]);
}

#[test]
fn zero_tolerance_matches_exact_values() {
    let mut session = experiments();
    session.set_query_target("temp", 45.0).unwrap();
    session.set_query_target("pressure", 4.0).unwrap();
    session.set_tolerance(0.0).unwrap();
    assert_eq!(session.find_similar().unwrap(), vec![3]);
}

#[test]
fn empty_query_is_reported() {
    let mut session = experiments();
    assert!(matches!(
        session.find_similar(),
        Err(Error::Query(QueryError::EmptyQuery))
    ));
}

#[test]
fn categorical_brush_excludes_other_values() {
    let mut session = experiments();
    session.set_brush_values("material", &["steel"]).unwrap();
    assert_eq!(session.selection(), Some(&[0, 2, 4, 6][..]));

    session
        .set_brush("pressure", pcoord_core::Brush::range(1.0, 5.0))
        .unwrap();
    let selected = session.selection().unwrap().to_vec();
    assert_eq!(selected, vec![0, 2, 4, 6]);
    assert_eq!(session.selection_stats().to_string(), "4 out of 8 results selected");
}

#[test]
fn pixel_drag_then_click_clears() {
    let mut session = experiments();
    session.recompute_selection();
    // Default chart: 900 x 440 inside the margins; temp 0 at y=440, 100 at y=0.
    assert_eq!(session.brush_start("temp", 440.0).unwrap(), BrushTransition::Started);
    assert_eq!(session.brush_move("temp", 300.0).unwrap(), BrushTransition::Moved);
    assert_eq!(session.brush_end("temp", 220.0).unwrap(), BrushTransition::Committed);
    assert_eq!(session.selection(), Some(&[0, 1, 2, 3, 4][..]));

    assert_eq!(session.brush_start("temp", 100.0).unwrap(), BrushTransition::Started);
    assert_eq!(session.brush_end("temp", 100.0).unwrap(), BrushTransition::Cleared);
    assert_eq!(session.selection().map(<[usize]>::len), Some(8));
    assert_eq!(session.brush_move("temp", 50.0).unwrap(), BrushTransition::Ignored);
}

#[test]
fn selection_events_arrive_in_database_order() {
    let mut session = experiments();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.on(EventKind::SelectionChange, move |event| {
        if let Event::SelectionChange(rows) = event {
            sink.borrow_mut().push(rows.clone());
        }
    });

    session.set_sort("temp", pcoord_core::SortDirection::Descending).unwrap();
    session.set_brush_values("material", &["glass"]).unwrap();

    assert_eq!(*seen.borrow(), vec![vec![1, 3, 5, 7]]);
    assert_eq!(session.ordered_selection(), &[7, 5, 3, 1]);
}

#[test]
fn file_columns_follow_the_configured_pattern() {
    let (names, raw) = table(&["name", "path"], &[vec!["a".into(), "x.png".into()]]);
    let mut config = SessionConfig::default();
    config.classify.file_pattern = "^path$".into();
    let session = Session::load(&names, &raw, config).unwrap();
    let files: Vec<_> = session.database().file_dimensions().map(|(_, d)| d.name.clone()).collect();
    assert_eq!(files, vec!["path"]);
}

#[test]
fn inconsistent_rows_fail_to_load() {
    let (names, mut raw) = table(&["a", "b"], &[vec!["1".into(), "2".into()]]);
    raw[0].remove("b");
    let err = Session::load(&names, &raw, SessionConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::MissingDimension { .. })));
}

#[test]
fn overlays_cover_every_axis() {
    let mut session = experiments();
    session.set_query_target("pressure", 3.0).unwrap();
    let overlays = session.project_overlays();
    let styles: Vec<_> = overlays.iter().map(|(style, _)| *style).collect();
    assert_eq!(
        styles,
        vec![OverlayStyle::Custom, OverlayStyle::LowerBound, OverlayStyle::UpperBound]
    );
    for (_, path) in &overlays {
        assert_eq!(path.vertices.len(), 4);
    }
}

#[test]
fn paginate_sorted_selection() {
    let keys: Vec<u32> = (0..25).map(|i| (i * 7) % 25).collect();
    let selection: Vec<usize> = (0..25).collect();
    let ordered = ordering::sort(&selection, |a, b| keys[a].cmp(&keys[b]));
    let size = PageSize::new(10).unwrap();

    let first: Vec<u32> = ordering::paginate(&ordered, size, 1).iter().map(|&i| keys[i]).collect();
    let third: Vec<u32> = ordering::paginate(&ordered, size, 3).iter().map(|&i| keys[i]).collect();
    assert_eq!(first, (0..10).collect::<Vec<_>>());
    assert_eq!(third, (20..25).collect::<Vec<_>>());
}

#[test]
fn seventy_three_results_use_the_window() {
    let size = PageSize::new(10).unwrap();
    assert_eq!(ordering::page_count(73, size), 8);
    let buttons = ordering::page_buttons(73, size, 4);
    assert_eq!(buttons.len(), 7);
    assert!(buttons.iter().all(|b| b.kind != PageButtonKind::Page));
    assert_eq!(buttons[3].target, 4);
    assert!(buttons[3].selected);
}

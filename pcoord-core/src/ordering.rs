//! Result ordering and pagination.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::Database;
use crate::types::{DimIndex, RowIndex, Value};

/// Up to this many pages get one button each.
pub const MAX_PLAIN_BUTTONS: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, OrderingError> {
        NonZeroUsize::new(size).map(Self).ok_or(OrderingError::ZeroPageSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(9))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort of a selection; ties keep database order.
pub fn sort<F>(selection: &[RowIndex], compare: F) -> Vec<RowIndex>
where
    F: FnMut(RowIndex, RowIndex) -> Ordering,
{
    let mut ordered = Vec::with_capacity(selection.len());
    sort_into(selection, &mut ordered, compare);
    ordered
}

/// [`sort`] into a caller-owned buffer, keeping its allocation.
pub fn sort_into<F>(selection: &[RowIndex], ordered: &mut Vec<RowIndex>, mut compare: F)
where
    F: FnMut(RowIndex, RowIndex) -> Ordering,
{
    ordered.clear();
    ordered.extend_from_slice(selection);
    ordered.sort_unstable();
    ordered.sort_by(|&a, &b| compare(a, b));
}

/// Sort by one dimension into `ordered`. Numbers compare by value,
/// categories by their first-seen rank, which is also their position on the
/// axis.
pub fn sort_by_dimension(
    selection: &[RowIndex],
    db: &Database,
    dim: DimIndex,
    direction: SortDirection,
    ordered: &mut Vec<RowIndex>,
) {
    sort_into(selection, ordered, |a, b| {
        let ord = compare_values(db.value(a, dim), db.value(b, dim));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    })
}

fn compare_values(a: Option<Value>, b: Option<Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.total_cmp(&y),
        (Some(Value::Category(x)), Some(Value::Category(y))) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

pub fn page_count(total: usize, page_size: PageSize) -> usize {
    total.div_ceil(page_size.get())
}

/// Clamp a 1-based page number into `[1, last page]`.
pub fn clamp_page(total: usize, page_size: PageSize, page: usize) -> usize {
    page.clamp(1, page_count(total, page_size).max(1))
}

/// Rows of one 1-based page. Out-of-range pages clamp to the first or last.
pub fn paginate(ordered: &[RowIndex], page_size: PageSize, page: usize) -> &[RowIndex] {
    let page = clamp_page(ordered.len(), page_size, page);
    let start = ((page - 1) * page_size.get()).min(ordered.len());
    let end = (page * page_size.get()).min(ordered.len());
    &ordered[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageButtonKind {
    Page,
    First,
    Previous,
    StepBack,
    Current,
    StepForward,
    Next,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageButton {
    pub kind: PageButtonKind,
    /// 1-based page this button navigates to.
    pub target: usize,
    pub selected: bool,
}

/// Jump size for the step buttons: one order of magnitude below the page
/// count, never less than ten.
pub fn page_step(pages: usize) -> usize {
    let magnitude = pages.checked_ilog10().unwrap_or(0);
    10usize.pow(magnitude.max(1))
}

/// Navigation buttons for `total` rows.
///
/// Seven pages or fewer get one button per page. Beyond that the layout is a
/// fixed seven-slot window: first, previous, step back, current, step
/// forward, next, last.
pub fn page_buttons(total: usize, page_size: PageSize, current: usize) -> Vec<PageButton> {
    let pages = page_count(total, page_size);
    if pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, pages);

    if pages <= MAX_PLAIN_BUTTONS {
        return (1..=pages)
            .map(|target| PageButton {
                kind: PageButtonKind::Page,
                target,
                selected: target == current,
            })
            .collect();
    }

    let step = page_step(pages);
    let button = |kind, target: usize| PageButton {
        kind,
        target,
        selected: target == current && kind == PageButtonKind::Current,
    };
    vec![
        button(PageButtonKind::First, 1),
        button(PageButtonKind::Previous, current.saturating_sub(1).max(1)),
        button(PageButtonKind::StepBack, current.saturating_sub(step).max(1)),
        button(PageButtonKind::Current, current),
        button(PageButtonKind::StepForward, (current + step).min(pages)),
        button(PageButtonKind::Next, (current + 1).min(pages)),
        button(PageButtonKind::Last, pages),
    ]
}

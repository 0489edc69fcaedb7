//! Change notifications.
//!
//! Listeners are plain closures registered per event kind. Delivery is
//! synchronous and follows registration order.

use crate::query::OverlayPath;
use crate::types::RowIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SelectionChange,
    AxisOrderChange,
    QueryChange,
    Highlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectionChange(Vec<RowIndex>),
    AxisOrderChange(Vec<String>),
    QueryChange {
        upper: OverlayPath,
        lower: OverlayPath,
        custom: OverlayPath,
    },
    Highlight(Option<RowIndex>),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SelectionChange(_) => EventKind::SelectionChange,
            Event::AxisOrderChange(_) => EventKind::AxisOrderChange,
            Event::QueryChange { .. } => EventKind::QueryChange,
            Event::Highlight(_) => EventKind::Highlight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&Event)>;

#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<(ListenerId, EventKind, Listener)>,
    next_id: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already removed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &Event) {
        let kind = event.kind();
        for (_, _, listener) in self.listeners.iter_mut().filter(|(_, k, _)| *k == kind) {
            listener(event);
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_delivery_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();

        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            dispatcher.on(EventKind::SelectionChange, move |event| {
                if let Event::SelectionChange(rows) = event {
                    log.borrow_mut().push((tag, rows.len()));
                }
            });
        }
        let other = Rc::clone(&log);
        dispatcher.on(EventKind::Highlight, move |_| other.borrow_mut().push(("highlight", 0)));

        dispatcher.emit(&Event::SelectionChange(vec![1, 2]));
        assert_eq!(*log.borrow(), vec![("first", 2), ("second", 2)]);
    }

    #[test]
    fn test_off() {
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = Dispatcher::new();
        let c = Rc::clone(&count);
        let id = dispatcher.on(EventKind::Highlight, move |_| *c.borrow_mut() += 1);

        dispatcher.emit(&Event::Highlight(Some(3)));
        assert!(dispatcher.off(id));
        assert!(!dispatcher.off(id));
        dispatcher.emit(&Event::Highlight(None));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(dispatcher.listener_count(EventKind::Highlight), 0);
    }
}

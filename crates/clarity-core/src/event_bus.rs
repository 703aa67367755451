//! Event bus between the chat controller and the view layer.
//!
//! Single-threaded (WASM constraint), interior mutability via RefCell.
//! The page drains it only when it asks for a fresh view, so the queue is
//! bounded: past `capacity` the oldest events are dropped.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use clarity_types::event::ClarityEvent;

pub const DEFAULT_CAPACITY: usize = 256;

struct Queue {
    events: RefCell<VecDeque<ClarityEvent>>,
    capacity: usize,
    dropped: Cell<usize>,
}

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<Queue>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(Queue {
                events: RefCell::new(VecDeque::new()),
                capacity: capacity.max(1),
                dropped: Cell::new(0),
            }),
        }
    }

    pub fn emit(&self, event: ClarityEvent) {
        log::debug!("event: {:?}", event);
        let mut events = self.inner.events.borrow_mut();
        if events.len() == self.inner.capacity {
            events.pop_front();
            self.inner.dropped.set(self.inner.dropped.get() + 1);
        }
        events.push_back(event);
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&self) -> Vec<ClarityEvent> {
        let dropped = self.inner.dropped.replace(0);
        if dropped > 0 {
            log::warn!("{} event(s) dropped before the view caught up", dropped);
        }
        self.inner.events.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.events.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_pending()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

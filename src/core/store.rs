//=========================================================================
// Activity Store
//=========================================================================
//
// Observable navigation state: which view is current and which character
// is selected.
//
// The app shell subscribes and switches scenes when the view changes.
// Scenes and widgets read and write the character index directly.
// Every effective write bumps a version; subscribers compare versions on
// poll, so a burst of writes between two polls collapses into one
// notification carrying the latest state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

//=== ActivityState =======================================================

/// View name shown at startup.
pub const DEFAULT_VIEW: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityState {
    pub current_view: String,
    pub char_number: usize,
}

impl Default for ActivityState {
    fn default() -> Self {
        Self {
            current_view: DEFAULT_VIEW.to_string(),
            char_number: 0,
        }
    }
}

//=== ActivityStore =======================================================

struct Inner {
    state: ActivityState,
    version: u64,
}

/// Shared handle to the activity state. Clones observe the same state.
#[derive(Clone)]
pub struct ActivityStore {
    inner: Rc<RefCell<Inner>>,
}

impl ActivityStore {
    pub fn new(state: ActivityState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner { state, version: 0 })),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ActivityState {
        self.inner.borrow().state.clone()
    }

    pub fn current_view(&self) -> String {
        self.inner.borrow().state.current_view.clone()
    }

    pub fn char_number(&self) -> usize {
        self.inner.borrow().state.char_number
    }

    pub fn set_current_view(&self, view: impl Into<String>) {
        let view = view.into();
        self.update(|state| {
            if state.current_view == view {
                return false;
            }
            debug!(target: "app", "View {} -> {}", state.current_view, view);
            state.current_view = view;
            true
        });
    }

    pub fn set_char_number(&self, char_number: usize) {
        self.update(|state| {
            if state.char_number == char_number {
                return false;
            }
            state.char_number = char_number;
            true
        });
    }

    /// Starts observing from the current version.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            store: self.clone(),
            seen: self.inner.borrow().version,
        }
    }

    fn update(&self, apply: impl FnOnce(&mut ActivityState) -> bool) {
        let mut inner = self.inner.borrow_mut();
        if apply(&mut inner.state) {
            inner.version += 1;
        }
    }
}

impl Default for ActivityStore {
    fn default() -> Self {
        Self::new(ActivityState::default())
    }
}

//=== Subscription ========================================================

/// Change cursor over an [`ActivityStore`].
pub struct Subscription {
    store: ActivityStore,
    seen: u64,
}

impl Subscription {
    /// Returns the latest state if it changed since the previous poll.
    pub fn poll(&mut self) -> Option<ActivityState> {
        let inner = self.store.inner.borrow();
        if inner.version == self.seen {
            return None;
        }
        self.seen = inner.version;
        Some(inner.state.clone())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

use std::sync::{Mutex, MutexGuard};

use super::Route;

/// Current location plus the history behind it.
#[derive(Debug)]
pub struct Navigator {
    state: Mutex<History>,
}

#[derive(Debug)]
struct History {
    current: Route,
    back: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            state: Mutex::new(History {
                current: start,
                back: Vec::new(),
            }),
        }
    }

    pub fn current(&self) -> Route {
        self.lock().current.clone()
    }

    /// Move to `route`, remembering where we were.
    pub fn navigate(&self, route: Route) {
        let mut state = self.lock();
        if state.current == route {
            return;
        }
        tracing::info!(from = %state.current, to = %route, "Navigated");
        let previous = std::mem::replace(&mut state.current, route);
        state.back.push(previous);
    }

    /// Return to the previous route; the catalog when there is none.
    pub fn back(&self) -> Route {
        let mut state = self.lock();
        let previous = state.back.pop().unwrap_or(Route::Catalog);
        tracing::debug!(from = %state.current, to = %previous, "Navigated back");
        state.current = previous.clone();
        previous
    }

    /// Number of routes that [`back`](Self::back) can return to.
    pub fn depth(&self) -> usize {
        self.lock().back.len()
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Catalog)
    }
}

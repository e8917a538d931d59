//! History interception
//!
//! `GlobalHistory` is the replaceable global history object. Installing the
//! interceptor captures its current entry points once and swaps in a
//! `PatchedHistory`, which runs the original primitive and then dispatches a
//! synthetic `popstate`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::event::{EventTarget, PopStateEvent, WindowEvent};
use crate::host::HistoryPrimitives;
use crate::state::InterceptorState;
use crate::Result;

pub type SharedPrimitives = Arc<dyn HistoryPrimitives + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
}

/// Wrapper around the captured native primitives.
///
/// Errors from the original call are returned untouched and suppress the
/// notification.
pub struct PatchedHistory {
    original: SharedPrimitives,
    events: Arc<EventTarget>,
}

impl PatchedHistory {
    pub fn new(original: SharedPrimitives, events: Arc<EventTarget>) -> Self {
        Self { original, events }
    }

    fn notify(&self, method: &'static str, url: Option<&str>) {
        tracing::debug!(method, url = url.unwrap_or(""), "Dispatching synthetic popstate");
        let event = WindowEvent::PopState(PopStateEvent {
            state: self.original.state(),
        });
        self.events.dispatch_event(&event);
    }
}

impl HistoryPrimitives for PatchedHistory {
    fn push_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> Result<()> {
        self.original.push_state(state, title, url)?;
        self.notify("pushState", url);
        Ok(())
    }

    fn replace_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> Result<()> {
        self.original.replace_state(state, title, url)?;
        self.notify("replaceState", url);
        Ok(())
    }

    fn state(&self) -> Option<Value> {
        self.original.state()
    }
}

/// The global history object every caller on the page goes through.
pub struct GlobalHistory {
    entry_points: RwLock<SharedPrimitives>,
    status: RwLock<InterceptorState>,
}

impl GlobalHistory {
    pub fn new(native: SharedPrimitives) -> Self {
        Self {
            entry_points: RwLock::new(native),
            status: RwLock::new(InterceptorState::Uninstalled),
        }
    }

    pub fn status(&self) -> InterceptorState {
        *self.status.read()
    }

    /// Patch push/replace. Only the first call has an effect.
    pub fn install(&self, events: Arc<EventTarget>) -> InstallOutcome {
        let mut status = self.status.write();
        if status.is_installed() {
            tracing::debug!("History interceptor already installed");
            return InstallOutcome::AlreadyInstalled;
        }

        let mut entry_points = self.entry_points.write();
        let original = entry_points.clone();
        *entry_points = Arc::new(PatchedHistory::new(original, events));
        *status = InterceptorState::Installed;

        tracing::info!("Installed history interceptor");
        InstallOutcome::Installed
    }

    // The lock is released before the call so listeners can re-enter.
    fn current(&self) -> SharedPrimitives {
        self.entry_points.read().clone()
    }
}

impl HistoryPrimitives for GlobalHistory {
    fn push_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> Result<()> {
        self.current().push_state(state, title, url)
    }

    fn replace_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> Result<()> {
        self.current().replace_state(state, title, url)
    }

    fn state(&self) -> Option<Value> {
        self.current().state()
    }
}

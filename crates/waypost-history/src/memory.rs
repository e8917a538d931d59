//! In-memory browsing context
//!
//! Behaves like a browser tab for everything the navigation core touches:
//! a session history stack, native push/replace with the same-origin rule,
//! back/forward traversal with native `popstate`, fragment navigation with
//! `hashchange`, and full page loads (recorded instead of performed).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::error::HistoryError;
use crate::event::{
    EventKind, EventTarget, HashChangeEvent, Listener, ListenerId, PopStateEvent, WindowEvent,
};
use crate::host::{BrowserHost, HistoryPrimitives, Location};
use crate::interceptor::{GlobalHistory, InstallOutcome};
use crate::state::InterceptorState;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub url: Url,
    pub state: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl SessionEntry {
    fn new(url: Url, state: Option<Value>) -> Self {
        Self {
            url,
            state,
            created_at: Utc::now(),
        }
    }
}

/// A full document load requested through `Location::assign`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLoad {
    pub url: Url,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct SessionStack {
    entries: Vec<SessionEntry>,
    index: usize,
}

impl SessionStack {
    fn current(&self) -> &SessionEntry {
        &self.entries[self.index]
    }

    fn push(&mut self, entry: SessionEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, entry: SessionEntry) {
        self.entries[self.index] = entry;
    }
}

/// Native browsing-context state: the unpatched history primitives and the
/// location.
#[derive(Debug)]
pub struct MemorySession {
    stack: RwLock<SessionStack>,
    page_loads: RwLock<Vec<PageLoad>>,
    events: Arc<EventTarget>,
}

impl MemorySession {
    fn new(start: Url, events: Arc<EventTarget>) -> Self {
        Self {
            stack: RwLock::new(SessionStack {
                entries: vec![SessionEntry::new(start, None)],
                index: 0,
            }),
            page_loads: RwLock::new(Vec::new()),
            events,
        }
    }

    pub fn url(&self) -> Url {
        self.stack.read().current().url.clone()
    }

    pub fn len(&self) -> usize {
        self.stack.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.read().entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.stack.read().index
    }

    pub fn entries(&self) -> Vec<SessionEntry> {
        self.stack.read().entries.clone()
    }

    pub fn page_loads(&self) -> Vec<PageLoad> {
        self.page_loads.read().clone()
    }

    /// Resolve a history URL argument the way `pushState` does.
    fn resolve_same_origin(&self, url: Option<&str>) -> Result<Url> {
        let current = self.url();
        let Some(raw) = url else {
            return Ok(current);
        };

        let resolved = current
            .join(raw)
            .map_err(|e| HistoryError::Syntax(format!("{}: {}", raw, e)))?;

        if resolved.origin() != current.origin() {
            return Err(HistoryError::Security {
                url: resolved.to_string(),
                origin: current.origin().ascii_serialization(),
            });
        }

        Ok(resolved)
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Traverse the session history. Returns false when the target is out of
    /// range (or `delta` is zero) and nothing happened.
    pub fn go(&self, delta: isize) -> bool {
        let (from, to) = {
            let mut stack = self.stack.write();
            let target = match (stack.index as isize).checked_add(delta) {
                Some(target) if delta != 0 && target >= 0 => target as usize,
                _ => return false,
            };
            if target >= stack.entries.len() {
                return false;
            }
            let from = stack.current().clone();
            stack.index = target;
            (from, stack.current().clone())
        };

        tracing::debug!(from = %from.url, to = %to.url, delta, "History traversal");

        self.events.dispatch_event(&WindowEvent::PopState(PopStateEvent {
            state: to.state.clone(),
        }));
        if from.url != to.url && only_fragment_differs(&from.url, &to.url) {
            self.events
                .dispatch_event(&WindowEvent::HashChange(HashChangeEvent {
                    old_url: from.url.to_string(),
                    new_url: to.url.to_string(),
                }));
        }
        true
    }

    /// Native fragment navigation (`location.hash = ...`). Returns false when
    /// the fragment is unchanged.
    pub fn set_hash(&self, fragment: &str) -> bool {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let (old_url, new_url) = {
            let mut stack = self.stack.write();
            let old_url = stack.current().url.clone();
            let mut new_url = old_url.clone();
            new_url.set_fragment(Some(fragment));
            if new_url == old_url {
                return false;
            }
            stack.push(SessionEntry::new(new_url.clone(), None));
            (old_url, new_url)
        };

        tracing::debug!(from = %old_url, to = %new_url, "Fragment navigation");

        self.events
            .dispatch_event(&WindowEvent::PopState(PopStateEvent { state: None }));
        self.events
            .dispatch_event(&WindowEvent::HashChange(HashChangeEvent {
                old_url: old_url.to_string(),
                new_url: new_url.to_string(),
            }));
        true
    }
}

fn only_fragment_differs(a: &Url, b: &Url) -> bool {
    a[..url::Position::AfterQuery] == b[..url::Position::AfterQuery]
}

impl HistoryPrimitives for MemorySession {
    fn push_state(&self, state: Option<Value>, _title: &str, url: Option<&str>) -> Result<()> {
        let url = self.resolve_same_origin(url)?;
        tracing::trace!(url = %url, "Native pushState");
        self.stack.write().push(SessionEntry::new(url, state));
        Ok(())
    }

    fn replace_state(&self, state: Option<Value>, _title: &str, url: Option<&str>) -> Result<()> {
        let url = self.resolve_same_origin(url)?;
        tracing::trace!(url = %url, "Native replaceState");
        self.stack.write().replace(SessionEntry::new(url, state));
        Ok(())
    }

    fn state(&self) -> Option<Value> {
        self.stack.read().current().state.clone()
    }
}

impl Location for MemorySession {
    fn current_url(&self) -> Result<Url> {
        Ok(self.url())
    }

    fn assign(&self, url: &Url) -> Result<()> {
        tracing::info!(url = %url, "Page load");
        self.page_loads.write().push(PageLoad {
            url: url.clone(),
            loaded_at: Utc::now(),
        });
        self.stack.write().push(SessionEntry::new(url.clone(), None));
        Ok(())
    }
}

/// A complete in-memory browser window
pub struct MemoryBrowser {
    session: Arc<MemorySession>,
    history: GlobalHistory,
    events: Arc<EventTarget>,
}

impl MemoryBrowser {
    pub fn new(start_url: &str) -> Result<Self> {
        let start = Url::parse(start_url)
            .map_err(|e| HistoryError::Syntax(format!("{}: {}", start_url, e)))?;
        let events = Arc::new(EventTarget::new());
        let session = Arc::new(MemorySession::new(start, events.clone()));
        let history = GlobalHistory::new(session.clone());

        Ok(Self {
            session,
            history,
            events,
        })
    }

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn events(&self) -> &Arc<EventTarget> {
        &self.events
    }

    pub fn global_history(&self) -> &GlobalHistory {
        &self.history
    }

    pub fn url(&self) -> Url {
        self.session.url()
    }

    pub fn page_loads(&self) -> Vec<PageLoad> {
        self.session.page_loads()
    }

    pub fn back(&self) -> bool {
        self.session.back()
    }

    pub fn forward(&self) -> bool {
        self.session.forward()
    }

    pub fn go(&self, delta: isize) -> bool {
        self.session.go(delta)
    }

    pub fn set_hash(&self, fragment: &str) -> bool {
        self.session.set_hash(fragment)
    }
}

impl BrowserHost for MemoryBrowser {
    fn location(&self) -> &dyn Location {
        self.session.as_ref()
    }

    fn history(&self) -> &dyn HistoryPrimitives {
        &self.history
    }

    fn install_interceptor(&self) -> Result<InstallOutcome> {
        Ok(self.history.install(self.events.clone()))
    }

    fn interceptor_state(&self) -> InterceptorState {
        self.history.status()
    }

    fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.events.add_event_listener(kind, listener)
    }

    fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.events.remove_event_listener(id)
    }
}

impl std::fmt::Debug for MemoryBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBrowser")
            .field("url", &self.url().as_str())
            .field("interceptor", &self.history.status())
            .finish()
    }
}

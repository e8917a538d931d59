//! Browser globals as seen by the navigation core
//!
//! Nothing here caches browser state: every read goes to the host.

use serde_json::Value;
use url::Url;

use crate::event::{EventKind, Listener, ListenerId};
use crate::interceptor::InstallOutcome;
use crate::state::InterceptorState;
use crate::Result;

/// The two history-mutation entry points plus the current entry's state.
pub trait HistoryPrimitives {
    fn push_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> Result<()>;

    fn replace_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> Result<()>;

    /// State object of the current history entry
    fn state(&self) -> Option<Value>;
}

pub trait Location {
    fn current_url(&self) -> Result<Url>;

    /// Full document navigation. On a real browser nothing runs after this.
    fn assign(&self, url: &Url) -> Result<()>;
}

/// A browsing context: location, the global history object and the global
/// event target.
pub trait BrowserHost {
    fn location(&self) -> &dyn Location;

    /// The global history object, patched once the interceptor is installed
    fn history(&self) -> &dyn HistoryPrimitives;

    fn install_interceptor(&self) -> Result<InstallOutcome>;

    fn interceptor_state(&self) -> InterceptorState;

    fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    fn remove_event_listener(&self, id: ListenerId) -> bool;
}

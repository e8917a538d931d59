//! Waypost History
//!
//! The browser's history stack is shared by every application on the page.
//! Native `pushState` / `replaceState` never notify anyone, so the global
//! history object is patched once and every call is followed by a synthetic
//! `popstate`:
//!
//! ```text
//! caller -> GlobalHistory -> PatchedHistory -> native primitive
//!                                     |
//!                                     +-> popstate on the global event target
//! ```

mod error;
mod event;
mod host;
mod interceptor;
mod memory;
mod state;

pub use error::HistoryError;
pub use event::{
    EventKind, EventTarget, HashChangeEvent, Listener, ListenerId, PopStateEvent, WindowEvent,
};
pub use host::{BrowserHost, HistoryPrimitives, Location};
pub use interceptor::{GlobalHistory, InstallOutcome, PatchedHistory, SharedPrimitives};
pub use memory::{MemoryBrowser, MemorySession, PageLoad, SessionEntry};
pub use state::InterceptorState;

pub type Result<T> = std::result::Result<T, HistoryError>;

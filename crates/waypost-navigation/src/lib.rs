//! Waypost Navigation
//!
//! Navigation target resolution:
//! 1. URL string, link click or link element → raw destination
//! 2. Raw destination → absolute URL (`#...` only swaps the fragment)
//! 3. Same origin → push/replace on the global history object
//! 4. Different origin → full page load (or a report, in testing environments)

mod error;
mod options;
mod plan;
mod resolver;
mod target;

pub use error::NavigationError;
pub use options::{NavigateOptions, NavigationOutcome, ReloadReport};
pub use plan::{resolve_destination, NavigationDecision, NavigationPlan};
pub use resolver::{navigate_to_url, NavigationResolver};
pub use target::{Anchor, ClickEvent, LinkClick, LinkElement, NavigationTarget};

pub type Result<T> = std::result::Result<T, NavigationError>;

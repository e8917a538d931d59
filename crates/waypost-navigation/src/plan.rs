//! Destination resolution and the reload/transition decision
//!
//! Only a change of origin forces a real page load. Everything else is an
//! in-page transition through the history API.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationDecision {
    /// Same origin: push or replace a history entry
    InPageTransition,
    /// Different origin: load the document
    PageReload,
}

impl NavigationDecision {
    pub fn between(current: &Url, destination: &Url) -> Self {
        // Opaque origins (data:, about:, ...) never compare equal.
        if current.origin() == destination.origin() {
            NavigationDecision::InPageTransition
        } else {
            NavigationDecision::PageReload
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationDecision::InPageTransition => "in-page-transition",
            NavigationDecision::PageReload => "page-reload",
        }
    }
}

impl std::fmt::Display for NavigationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve a raw destination against the current URL.
///
/// A destination starting with `#` only swaps the fragment of the current
/// URL. Anything else is joined like a link `href`.
pub fn resolve_destination(current: &Url, raw: &str) -> Result<Url> {
    if let Some(fragment) = raw.strip_prefix('#') {
        let mut url = current.clone();
        url.set_fragment(Some(fragment));
        return Ok(url);
    }

    current
        .join(raw)
        .map_err(|e| NavigationError::InvalidArgument(format!("{}: {}", raw, e)))
}

/// Resolved URL plus the decision, computed without touching the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPlan {
    pub url: Url,
    pub decision: NavigationDecision,
}

impl NavigationPlan {
    pub fn new(current: &Url, raw: &str) -> Result<Self> {
        let url = resolve_destination(current, raw)?;
        let decision = NavigationDecision::between(current, &url);
        Ok(Self { url, decision })
    }

    pub fn is_reload(&self) -> bool {
        self.decision == NavigationDecision::PageReload
    }
}

//! Navigation options and outcomes

use serde::{Deserialize, Serialize};
use url::Url;

/// Option bag accepted by `navigate_to_url` (`{ replace, isTestingEnv }`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
    /// Report page reloads instead of performing them
    pub is_testing_env: bool,
}

impl NavigateOptions {
    pub fn replacing() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }

    pub fn testing() -> Self {
        Self {
            is_testing_env: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// The history entry was pushed or replaced
    Transitioned { url: Url, replaced: bool },
    /// A full page load was started; nothing after this is observable on a
    /// real browser
    Reloading { url: Url },
    /// A page load was required but suppressed by `is_testing_env`
    WouldHaveReloadedThePage { url: Url },
}

impl NavigationOutcome {
    pub fn url(&self) -> &Url {
        match self {
            NavigationOutcome::Transitioned { url, .. }
            | NavigationOutcome::Reloading { url }
            | NavigationOutcome::WouldHaveReloadedThePage { url } => url,
        }
    }

    pub fn would_have_reloaded_the_page(&self) -> bool {
        matches!(self, NavigationOutcome::WouldHaveReloadedThePage { .. })
    }

    /// Caller-facing payload: only suppressed reloads carry one.
    pub fn report(&self) -> Option<ReloadReport> {
        self.would_have_reloaded_the_page().then_some(ReloadReport {
            would_have_reloaded_the_page: true,
        })
    }
}

/// `{ "wouldHaveReloadedThePage": true }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadReport {
    pub would_have_reloaded_the_page: bool,
}

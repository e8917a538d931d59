//! Navigation resolver
//!
//! Turns a target into exactly one of:
//! - a push/replace on the global history object (the installed interceptor
//!   turns that into a `popstate` for the routing layer)
//! - a full page load, for cross-origin destinations

use waypost_history::BrowserHost;

use crate::options::{NavigateOptions, NavigationOutcome};
use crate::plan::{NavigationDecision, NavigationPlan};
use crate::target::NavigationTarget;
use crate::Result;

pub struct NavigationResolver<'h> {
    host: &'h dyn BrowserHost,
}

impl<'h> NavigationResolver<'h> {
    pub fn new(host: &'h dyn BrowserHost) -> Self {
        Self { host }
    }

    /// Resolve a raw destination against the current location without
    /// navigating.
    pub fn plan(&self, raw: &str) -> Result<NavigationPlan> {
        let current = self.host.location().current_url()?;
        NavigationPlan::new(&current, raw)
    }

    pub fn navigate(
        &self,
        target: NavigationTarget<'_>,
        options: &NavigateOptions,
    ) -> Result<NavigationOutcome> {
        let kind = target.kind();
        let raw = target.into_destination().inspect_err(|e| {
            tracing::warn!(target_kind = kind, error = %e, "Rejected navigation target");
        })?;
        let plan = self.plan(&raw)?;

        tracing::debug!(
            target_kind = kind,
            url = %plan.url,
            decision = %plan.decision,
            replace = options.replace,
            "Resolved navigation"
        );

        match plan.decision {
            NavigationDecision::InPageTransition => {
                let history = self.host.history();
                if options.replace {
                    history.replace_state(None, "", Some(plan.url.as_str()))?;
                } else {
                    history.push_state(None, "", Some(plan.url.as_str()))?;
                }
                Ok(NavigationOutcome::Transitioned {
                    url: plan.url,
                    replaced: options.replace,
                })
            }
            NavigationDecision::PageReload if options.is_testing_env => {
                tracing::info!(url = %plan.url, "Suppressed page reload in testing environment");
                Ok(NavigationOutcome::WouldHaveReloadedThePage { url: plan.url })
            }
            NavigationDecision::PageReload => {
                tracing::info!(url = %plan.url, "Reloading page for cross-origin navigation");
                self.host.location().assign(&plan.url)?;
                Ok(NavigationOutcome::Reloading { url: plan.url })
            }
        }
    }
}

/// Navigate to a target: same-origin destinations become history
/// transitions, cross-origin destinations load the page.
pub fn navigate_to_url(
    host: &dyn BrowserHost,
    target: NavigationTarget<'_>,
    options: &NavigateOptions,
) -> Result<NavigationOutcome> {
    NavigationResolver::new(host).navigate(target, options)
}

//! Navigator
//!
//! Wires the navigation core to the routing layer: installs the history
//! interceptor, forwards `popstate` / `hashchange` to the reroute handler and
//! exposes `navigate_to_url` with the configured defaults.

use parking_lot::RwLock;
use std::sync::Arc;
use url::Url;

use waypost_history::{BrowserHost, EventKind, InstallOutcome, ListenerId, WindowEvent};
use waypost_navigation::{NavigateOptions, NavigationOutcome, NavigationResolver, NavigationTarget};

use crate::config::Config;
use crate::Result;

/// The routing layer: "something changed, re-evaluate which applications
/// should be active".
pub trait RerouteHandler: Send + Sync {
    fn reroute(&self, event: &WindowEvent);
}

impl<F> RerouteHandler for F
where
    F: Fn(&WindowEvent) + Send + Sync,
{
    fn reroute(&self, event: &WindowEvent) {
        self(event)
    }
}

pub struct Navigator<H: BrowserHost> {
    host: Arc<H>,
    config: Config,
    subscriptions: RwLock<Vec<ListenerId>>,
}

impl<H: BrowserHost> Navigator<H> {
    pub fn new(host: Arc<H>, config: Config) -> Self {
        Self {
            host,
            config,
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Install the interceptor and subscribe the reroute handler. Starting
    /// again swaps the handler.
    pub fn start(&self, handler: Arc<dyn RerouteHandler>) -> Result<InstallOutcome> {
        let outcome = self.host.install_interceptor()?;
        self.stop();

        let mut kinds = vec![EventKind::PopState];
        if self.config.reroute_on_hashchange {
            kinds.push(EventKind::HashChange);
        }

        let mut subscriptions = self.subscriptions.write();
        for kind in kinds {
            let handler = handler.clone();
            let id = self.host.add_event_listener(
                kind,
                Arc::new(move |event: &WindowEvent| {
                    tracing::debug!(kind = %event.kind(), "Reroute triggered");
                    handler.reroute(event);
                }),
            );
            subscriptions.push(id);
        }

        tracing::info!(
            interceptor = ?outcome,
            listeners = subscriptions.len(),
            "Navigator started"
        );
        Ok(outcome)
    }

    /// Unsubscribe the reroute handler. The interceptor stays installed.
    pub fn stop(&self) {
        let ids: Vec<ListenerId> = self.subscriptions.write().drain(..).collect();
        for id in ids {
            self.host.remove_event_listener(id);
        }
    }

    pub fn is_started(&self) -> bool {
        !self.subscriptions.read().is_empty()
    }

    pub fn navigate_to_url(
        &self,
        target: NavigationTarget<'_>,
        options: NavigateOptions,
    ) -> Result<NavigationOutcome> {
        let options = NavigateOptions {
            is_testing_env: options.is_testing_env || self.config.testing_env,
            ..options
        };
        Ok(NavigationResolver::new(self.host.as_ref()).navigate(target, &options)?)
    }

    pub fn current_url(&self) -> Result<Url> {
        Ok(self.host.location().current_url()?)
    }
}

impl<H: BrowserHost> Drop for Navigator<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use waypost_history::{HistoryPrimitives, InterceptorState, MemoryBrowser};
    use waypost_navigation::{Anchor, LinkClick};

    struct Recorder {
        events: Mutex<Vec<WindowEvent>>,
    }

    impl RerouteHandler for Recorder {
        fn reroute(&self, event: &WindowEvent) {
            self.events.lock().push(event.clone());
        }
    }

    fn setup(config: Config) -> (Arc<MemoryBrowser>, Navigator<MemoryBrowser>, Arc<Recorder>) {
        let browser = Arc::new(MemoryBrowser::new("https://x.test/start#a/initial").unwrap());
        let navigator = Navigator::new(browser.clone(), config);
        let recorder = Arc::new(Recorder {
            events: Mutex::new(Vec::new()),
        });
        (browser, navigator, recorder)
    }

    fn kinds(recorder: &Recorder) -> Vec<EventKind> {
        recorder.events.lock().iter().map(WindowEvent::kind).collect()
    }

    #[test]
    fn test_start_installs_interceptor() {
        let (browser, navigator, recorder) = setup(Config::default());
        assert_eq!(browser.interceptor_state(), InterceptorState::Uninstalled);

        assert_eq!(
            navigator.start(recorder.clone()).unwrap(),
            InstallOutcome::Installed
        );
        assert_eq!(browser.interceptor_state(), InterceptorState::Installed);
        assert!(navigator.is_started());

        // Restarting neither re-wraps nor doubles the subscription.
        assert_eq!(
            navigator.start(recorder.clone()).unwrap(),
            InstallOutcome::AlreadyInstalled
        );
        navigator
            .navigate_to_url("/next".into(), NavigateOptions::default())
            .unwrap();
        assert_eq!(kinds(&recorder), vec![EventKind::PopState]);
    }

    #[test]
    fn test_third_party_push_reroutes() {
        let (browser, navigator, recorder) = setup(Config::default());
        navigator.start(recorder.clone()).unwrap();

        browser
            .global_history()
            .push_state(None, "", Some("/from-elsewhere"))
            .unwrap();

        assert_eq!(kinds(&recorder), vec![EventKind::PopState]);
        assert_eq!(navigator.current_url().unwrap().path(), "/from-elsewhere");
    }

    #[test]
    fn test_link_click_reroutes() {
        let (_browser, navigator, recorder) = setup(Config::default());
        navigator.start(recorder.clone()).unwrap();
        let mut click = LinkClick::on(Anchor::new("/apps/two#section"));

        navigator
            .navigate_to_url(
                NavigationTarget::Click(&mut click),
                NavigateOptions::default(),
            )
            .unwrap();

        assert!(click.default_prevented());
        assert_eq!(kinds(&recorder), vec![EventKind::PopState]);
        assert_eq!(
            navigator.current_url().unwrap().as_str(),
            "https://x.test/apps/two#section"
        );
    }

    #[test]
    fn test_hashchange_subscription_follows_config() {
        let (browser, navigator, recorder) = setup(Config::default());
        navigator.start(recorder.clone()).unwrap();
        browser.set_hash("b");
        assert_eq!(
            kinds(&recorder),
            vec![EventKind::PopState, EventKind::HashChange]
        );

        let config = Config {
            reroute_on_hashchange: false,
            ..Config::default()
        };
        let (browser, navigator, recorder) = setup(config);
        navigator.start(recorder.clone()).unwrap();
        browser.set_hash("b");
        assert_eq!(kinds(&recorder), vec![EventKind::PopState]);
    }

    #[test]
    fn test_testing_env_from_config() {
        let config = Config {
            testing_env: true,
            ..Config::default()
        };
        let (browser, navigator, recorder) = setup(config);
        navigator.start(recorder.clone()).unwrap();

        let outcome = navigator
            .navigate_to_url("https://other.test/q".into(), NavigateOptions::default())
            .unwrap();

        assert!(outcome.would_have_reloaded_the_page());
        assert!(browser.page_loads().is_empty());
        assert!(kinds(&recorder).is_empty());
    }

    #[test]
    fn test_stop_unsubscribes() {
        let (browser, navigator, recorder) = setup(Config::default());
        navigator.start(recorder.clone()).unwrap();
        navigator.stop();
        assert!(!navigator.is_started());

        navigator
            .navigate_to_url("/quiet".into(), NavigateOptions::default())
            .unwrap();

        assert!(kinds(&recorder).is_empty());
        assert_eq!(browser.interceptor_state(), InterceptorState::Installed);
        assert_eq!(browser.events().listener_count(EventKind::PopState), 0);
    }

    #[test]
    fn test_closure_handler_may_redirect() {
        let (browser, navigator, _recorder) = setup(Config::default());
        let inner = browser.clone();
        navigator
            .start(Arc::new(move |_: &WindowEvent| {
                if inner.url().path() == "/admin" {
                    inner
                        .global_history()
                        .replace_state(None, "", Some("/login"))
                        .unwrap();
                }
            }))
            .unwrap();

        navigator
            .navigate_to_url("/admin".into(), NavigateOptions::default())
            .unwrap();

        assert_eq!(browser.url().path(), "/login");
    }
}

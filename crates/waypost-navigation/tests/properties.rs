use proptest::prelude::*;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use waypost_history::{BrowserHost, EventKind, MemoryBrowser};
use waypost_navigation::{
    navigate_to_url, NavigateOptions, NavigationError, NavigationOutcome, NavigationTarget,
};

const START: &str = "https://x.test/current/page?q=1#old";

fn installed_browser() -> MemoryBrowser {
    let browser = MemoryBrowser::new(START).unwrap();
    browser.install_interceptor().unwrap();
    browser
}

fn path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z0-9]{1,8}", 1..4).prop_map(|segments| {
        format!("/{}", segments.join("/"))
    })
}

proptest! {
    #[test]
    fn path_targets_transition_to_their_path(path in path_strategy()) {
        prop_assume!(path != "/current/page");
        let browser = installed_browser();

        let outcome = navigate_to_url(&browser, path.as_str().into(), &NavigateOptions::default())
            .unwrap();

        let is_transition = matches!(outcome, NavigationOutcome::Transitioned { .. });
        prop_assert!(is_transition);
        let url = browser.url();
        prop_assert_eq!(url.path(), path.as_str());
        prop_assert!(browser.page_loads().is_empty());
    }

    #[test]
    fn cross_origin_targets_never_transition(host in "[a-z]{1,10}", path in path_strategy()) {
        let browser = installed_browser();
        let target = format!("https://{}.other{}", host, path);

        let outcome = navigate_to_url(&browser, target.as_str().into(), &NavigateOptions::testing())
            .unwrap();

        prop_assert!(outcome.would_have_reloaded_the_page());
        let url = browser.url();
        prop_assert_eq!(url.as_str(), START);
        prop_assert_eq!(browser.session().len(), 1);
        prop_assert!(browser.page_loads().is_empty());
    }

    #[test]
    fn fragment_targets_only_swap_the_fragment(fragment in "[a-zA-Z0-9/_-]{0,12}") {
        let browser = installed_browser();
        let target = format!("#{}", fragment);

        navigate_to_url(&browser, target.as_str().into(), &NavigateOptions::default()).unwrap();

        let url = browser.url();
        prop_assert_eq!(url.path(), "/current/page");
        prop_assert_eq!(url.query(), Some("q=1"));
        prop_assert_eq!(url.fragment(), Some(fragment.as_str()));
    }

    #[test]
    fn repeated_navigation_lands_on_the_same_url(
        path in path_strategy(),
        fragment in proptest::option::of("[a-z]{1,6}"),
    ) {
        let browser = installed_browser();
        let target = match &fragment {
            Some(f) => format!("{}#{}", path, f),
            None => path.clone(),
        };

        navigate_to_url(&browser, target.as_str().into(), &NavigateOptions::default()).unwrap();
        let first = browser.url();
        navigate_to_url(&browser, target.as_str().into(), &NavigateOptions::default()).unwrap();

        prop_assert_eq!(browser.url(), first);
    }

    #[test]
    fn numbers_are_rejected(n in any::<i64>()) {
        let value = Value::from(n);
        let result = NavigationTarget::from_value(&value);
        prop_assert!(matches!(result, Err(NavigationError::InvalidArgument(_))));
    }

    #[test]
    fn every_history_call_notifies_exactly_once(paths in proptest::collection::vec(path_strategy(), 1..6)) {
        let browser = Arc::new(installed_browser());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let observer = browser.clone();
        browser.add_event_listener(
            EventKind::PopState,
            Arc::new(move |_| log.lock().unwrap().push(observer.url().path().to_string())),
        );

        for (i, path) in paths.iter().enumerate() {
            if i % 2 == 0 {
                navigate_to_url(&*browser, path.as_str().into(), &NavigateOptions::default())
                    .unwrap();
            } else {
                // Third-party code calling the history API directly.
                browser.history().push_state(None, "", Some(path.as_str())).unwrap();
            }
        }

        // One notification per call, each observing that call's destination.
        prop_assert_eq!(seen.lock().unwrap().clone(), paths);
    }
}

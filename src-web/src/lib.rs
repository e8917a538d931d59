//! Waypost - Browser bindings
//!
//! Exposes the navigation core to JavaScript:
//! - `installHistoryInterceptor()` patches `window.history` once
//! - `navigateToUrl(target, options)` for strings, link clicks and links
//! - `startNavigator(reroute, config)` wires `popstate` / `hashchange` to the router

mod host;
mod logging;
mod patch;
mod target;

use js_sys::{Function, JSON};
use std::cell::RefCell;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use waypost_core::{
    Config, InstallOutcome, NavigateOptions, Navigator, RerouteHandler, WindowEvent,
};

use host::js_error_text;

pub use host::{WebHistory, WebHost, WebLocation};
pub use logging::ConsoleWriter;

thread_local! {
    static NAVIGATOR: RefCell<Option<Navigator<WebHost>>> = const { RefCell::new(None) };
    static REROUTE: RefCell<Option<Function>> = const { RefCell::new(None) };
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Deserialize an optional JS object through JSON.
fn from_js<T>(value: &JsValue) -> Result<T, JsError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.is_null() || value.is_undefined() {
        return Ok(T::default());
    }
    let json = JSON::stringify(value)
        .map_err(|e| js_error(js_error_text(&e)))?
        .as_string()
        .unwrap_or_default();
    serde_json::from_str(&json).map_err(js_error)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    let json = serde_json::to_string(value).map_err(js_error)?;
    JSON::parse(&json).map_err(|e| js_error(js_error_text(&e)))
}

/// Forwards reroute requests to the JS callback registered with `startNavigator`.
struct JsReroute;

impl RerouteHandler for JsReroute {
    fn reroute(&self, event: &WindowEvent) {
        REROUTE.with(|reroute| {
            let Some(callback) = reroute.borrow().clone() else {
                return;
            };
            let arg = to_js(event).unwrap_or(JsValue::UNDEFINED);
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                tracing::warn!(error = %js_error_text(&e), "Reroute callback threw");
            }
        });
    }
}

/// Returns true when this call patched the history object.
#[wasm_bindgen(js_name = installHistoryInterceptor)]
pub fn install_history_interceptor() -> Result<bool, JsError> {
    let outcome = patch::install().map_err(|e| js_error(js_error_text(&e)))?;
    Ok(outcome == InstallOutcome::Installed)
}

/// `{ wouldHaveReloadedThePage: true }` for suppressed reloads, `undefined`
/// otherwise. Throws on an invalid target.
#[wasm_bindgen(js_name = navigateToUrl)]
pub fn navigate_to_url(target: JsValue, options: JsValue) -> Result<JsValue, JsError> {
    let options: NavigateOptions = from_js(&options)?;
    let host = WebHost::new().map_err(|e| js_error(js_error_text(&e)))?;
    let outcome = target::navigate(&host, &target, &options).map_err(js_error)?;

    match outcome.report() {
        Some(report) => to_js(&report),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Install the interceptor and call `reroute(event)` on every `popstate`
/// (and `hashchange`, unless disabled in `config`).
#[wasm_bindgen(js_name = startNavigator)]
pub fn start_navigator(reroute: Function, config: JsValue) -> Result<(), JsError> {
    let config = match config.as_string() {
        Some(json) => Config::from_json_str(&json).map_err(js_error)?,
        None => {
            let config: Config = from_js(&config)?;
            config.validate().map_err(js_error)?;
            config
        }
    };

    if !waypost_core::init_logging(&config, ConsoleWriter) {
        tracing::debug!("Logging already initialized; keeping the existing filter");
    }

    REROUTE.with(|slot| *slot.borrow_mut() = Some(reroute));

    let host = WebHost::new().map_err(|e| js_error(js_error_text(&e)))?;
    // wasm32 is single-threaded; the host never leaves this thread.
    #[allow(clippy::arc_with_non_send_sync)]
    let navigator = Navigator::new(Arc::new(host), config);
    navigator.start(Arc::new(JsReroute)).map_err(js_error)?;

    // The previous navigator, if any, unsubscribes on drop.
    NAVIGATOR.with(|slot| *slot.borrow_mut() = Some(navigator));
    Ok(())
}

//! `window.history` patch
//!
//! Replaces `history.pushState` and `history.replaceState` with wrappers that
//! call the captured originals and then dispatch a `popstate` on `window`.
//! Third-party code calling the history API directly goes through the
//! wrappers too.

use js_sys::{Function, Reflect};
use std::cell::Cell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{History, PopStateEvent, PopStateEventInit, Window};

use waypost_core::{EventKind, InstallOutcome, InterceptorState};

const PATCHED_METHODS: [&str; 2] = ["pushState", "replaceState"];

thread_local! {
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

pub fn state() -> InterceptorState {
    if INSTALLED.with(Cell::get) {
        InterceptorState::Installed
    } else {
        InterceptorState::Uninstalled
    }
}

/// Patch the global history object. Only the first call has an effect.
pub fn install() -> Result<InstallOutcome, JsValue> {
    if INSTALLED.with(Cell::get) {
        tracing::debug!("History interceptor already installed");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let history = window.history()?;

    for method in PATCHED_METHODS {
        patch_method(&window, &history, method)?;
    }
    INSTALLED.with(|installed| installed.set(true));

    tracing::info!("Installed history interceptor");
    Ok(InstallOutcome::Installed)
}

fn patch_method(window: &Window, history: &History, method: &'static str) -> Result<(), JsValue> {
    let key = JsValue::from_str(method);
    let original: Function = Reflect::get(history, &key)?.dyn_into()?;

    let this = history.clone();
    let target = window.clone();
    let wrapper = Closure::<dyn Fn(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
        move |state: JsValue, title: JsValue, url: JsValue| {
            // The receiver is always `window.history`, whatever the caller's `this`.
            // A throwing original propagates as-is and nothing is dispatched.
            let result = original.call3(&this, &state, &title, &url)?;
            tracing::debug!(method, "Dispatching synthetic popstate");
            dispatch_popstate(&target, &this)?;
            Ok(result)
        },
    );

    Reflect::set(history, &key, wrapper.as_ref())?;
    // Lives as long as the page.
    wrapper.forget();
    Ok(())
}

fn dispatch_popstate(window: &Window, history: &History) -> Result<(), JsValue> {
    let init = PopStateEventInit::new();
    init.set_state(&history.state()?);
    let event = PopStateEvent::new_with_event_init_dict(EventKind::PopState.as_str(), &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}

//! `BrowserHost` over the real browser globals

use js_sys::JSON;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use waypost_core::{
    BrowserHost, EventKind, HashChangeEvent, HistoryError, HistoryPrimitives, InstallOutcome,
    InterceptorState, ListenerId, Location, PopStateEvent, WindowEvent,
};

use crate::patch;

type HistoryResult<T> = std::result::Result<T, HistoryError>;

pub(crate) fn js_error_text(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    match err.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{:?}", err),
    }
}

fn native(err: JsValue) -> HistoryError {
    HistoryError::Native(js_error_text(&err))
}

/// History state crosses the boundary as JSON.
fn state_to_js(state: Option<Value>) -> HistoryResult<JsValue> {
    match state {
        None => Ok(JsValue::NULL),
        Some(value) => {
            let json =
                serde_json::to_string(&value).map_err(|e| HistoryError::Native(e.to_string()))?;
            JSON::parse(&json).map_err(native)
        }
    }
}

fn js_to_state(value: JsValue) -> Option<Value> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let json = JSON::stringify(&value).ok()?.as_string()?;
    serde_json::from_str(&json).ok()
}

pub struct WebHistory {
    history: web_sys::History,
}

impl HistoryPrimitives for WebHistory {
    fn push_state(&self, state: Option<Value>, title: &str, url: Option<&str>) -> HistoryResult<()> {
        self.history
            .push_state_with_url(&state_to_js(state)?, title, url)
            .map_err(native)
    }

    fn replace_state(
        &self,
        state: Option<Value>,
        title: &str,
        url: Option<&str>,
    ) -> HistoryResult<()> {
        self.history
            .replace_state_with_url(&state_to_js(state)?, title, url)
            .map_err(native)
    }

    fn state(&self) -> Option<Value> {
        self.history.state().ok().and_then(js_to_state)
    }
}

pub struct WebLocation {
    location: web_sys::Location,
}

impl Location for WebLocation {
    fn current_url(&self) -> HistoryResult<Url> {
        let href = self
            .location
            .href()
            .map_err(|e| HistoryError::Location(js_error_text(&e)))?;
        Url::parse(&href).map_err(|e| HistoryError::Location(format!("{}: {}", href, e)))
    }

    fn assign(&self, url: &Url) -> HistoryResult<()> {
        tracing::info!(url = %url, "Page load");
        self.location.assign(url.as_str()).map_err(native)
    }
}

type DomListener = Closure<dyn Fn(web_sys::Event)>;

pub struct WebHost {
    window: Window,
    history: WebHistory,
    location: WebLocation,
    listeners: RefCell<HashMap<ListenerId, (EventKind, DomListener)>>,
}

impl WebHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let history = WebHistory {
            history: window.history()?,
        };
        let location = WebLocation {
            location: window.location(),
        };

        Ok(Self {
            window,
            history,
            location,
            listeners: RefCell::new(HashMap::new()),
        })
    }
}

fn window_event(kind: EventKind, event: &web_sys::Event) -> Option<WindowEvent> {
    match kind {
        EventKind::PopState => {
            let event = event.dyn_ref::<web_sys::PopStateEvent>()?;
            Some(WindowEvent::PopState(PopStateEvent {
                state: js_to_state(event.state()),
            }))
        }
        EventKind::HashChange => {
            let event = event.dyn_ref::<web_sys::HashChangeEvent>()?;
            Some(WindowEvent::HashChange(HashChangeEvent {
                old_url: event.old_url(),
                new_url: event.new_url(),
            }))
        }
    }
}

impl BrowserHost for WebHost {
    fn location(&self) -> &dyn Location {
        &self.location
    }

    fn history(&self) -> &dyn HistoryPrimitives {
        &self.history
    }

    fn install_interceptor(&self) -> HistoryResult<InstallOutcome> {
        patch::install().map_err(native)
    }

    fn interceptor_state(&self) -> InterceptorState {
        patch::state()
    }

    fn add_event_listener(&self, kind: EventKind, listener: waypost_core::Listener) -> ListenerId {
        let id = ListenerId::new();
        let callback = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let Some(event) = window_event(kind, &event) {
                listener(&event);
            }
        });

        if let Err(e) = self
            .window
            .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
        {
            tracing::warn!(kind = %kind, error = %js_error_text(&e), "Failed to add listener");
        }

        self.listeners.borrow_mut().insert(id, (kind, callback));
        id
    }

    fn remove_event_listener(&self, id: ListenerId) -> bool {
        let Some((kind, callback)) = self.listeners.borrow_mut().remove(&id) else {
            return false;
        };

        if let Err(e) = self
            .window
            .remove_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
        {
            tracing::warn!(kind = %kind, error = %js_error_text(&e), "Failed to remove listener");
        }
        true
    }
}

//! JavaScript values as navigation targets

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use waypost_core::{
    navigate_to_url, BrowserHost, ClickEvent, LinkElement, NavigateOptions, NavigationError,
    NavigationOutcome, NavigationTarget,
};

fn href_of(value: &JsValue) -> Option<String> {
    Reflect::get(value, &JsValue::from_str("href"))
        .ok()?
        .as_string()
}

/// `<a>` (or anything with a string `href`) used as the call context
struct JsLink(JsValue);

impl LinkElement for JsLink {
    fn href(&self) -> Option<String> {
        href_of(&self.0)
    }
}

struct JsClick(web_sys::Event);

impl ClickEvent for JsClick {
    fn link_href(&self) -> Option<String> {
        self.0.current_target().and_then(|target| href_of(&target))
    }

    fn prevent_default(&mut self) {
        self.0.prevent_default();
    }
}

pub fn navigate(
    host: &dyn BrowserHost,
    target: &JsValue,
    options: &NavigateOptions,
) -> waypost_core::Result<NavigationOutcome> {
    if let Some(url) = target.as_string() {
        return Ok(navigate_to_url(host, NavigationTarget::Url(&url), options)?);
    }

    if let Some(event) = target.dyn_ref::<web_sys::Event>() {
        let mut click = JsClick(event.clone());
        return Ok(navigate_to_url(host, NavigationTarget::Click(&mut click), options)?);
    }

    if target.is_object() {
        let link = JsLink(target.clone());
        return Ok(navigate_to_url(host, NavigationTarget::Element(&link), options)?);
    }

    Err(NavigationError::InvalidArgument(
        "navigateToUrl must be called with a URL string, a link element or a click on a link"
            .to_string(),
    )
    .into())
}

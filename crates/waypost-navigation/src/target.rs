//! Navigation targets
//!
//! A navigation can be requested three ways:
//! 1. a URL string
//! 2. a click event whose current target is a link
//! 3. a link element used as the call context

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NavigationError;
use crate::Result;

/// Anything with a link target (`<a href>`)
pub trait LinkElement {
    fn href(&self) -> Option<String>;
}

/// A click on a link
pub trait ClickEvent {
    /// `href` of the element the listener is attached to
    fn link_href(&self) -> Option<String>;

    fn prevent_default(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub href: Option<String>,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
        }
    }
}

impl LinkElement for Anchor {
    fn href(&self) -> Option<String> {
        self.href.clone()
    }
}

/// Loosely typed context objects are link-like when they carry an `href` string.
impl LinkElement for Value {
    fn href(&self) -> Option<String> {
        self.get("href").and_then(Value::as_str).map(str::to_string)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkClick {
    pub current_target: Option<Anchor>,
    default_prevented: bool,
}

impl LinkClick {
    pub fn on(anchor: Anchor) -> Self {
        Self {
            current_target: Some(anchor),
            default_prevented: false,
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl ClickEvent for LinkClick {
    fn link_href(&self) -> Option<String> {
        self.current_target.as_ref().and_then(LinkElement::href)
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

pub enum NavigationTarget<'a> {
    Url(&'a str),
    Click(&'a mut dyn ClickEvent),
    Element(&'a dyn LinkElement),
}

impl<'a> NavigationTarget<'a> {
    /// Interpret an untyped argument: strings are URLs, objects are call
    /// contexts, anything else is rejected.
    pub fn from_value(value: &'a Value) -> Result<Self> {
        match value {
            Value::String(url) => Ok(NavigationTarget::Url(url)),
            Value::Object(_) => Ok(NavigationTarget::Element(value)),
            other => Err(NavigationError::InvalidArgument(format!(
                "expected a URL string, a link element or a click on a link, got {}",
                describe(other)
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NavigationTarget::Url(_) => "url",
            NavigationTarget::Click(_) => "click",
            NavigationTarget::Element(_) => "element",
        }
    }

    /// Validate the target and extract the raw destination string. A click
    /// has its default action prevented once it is known to carry a link.
    pub fn into_destination(self) -> Result<String> {
        match self {
            NavigationTarget::Url(url) => Ok(url.to_string()),
            NavigationTarget::Click(event) => {
                let href = non_empty(event.link_href()).ok_or_else(|| {
                    NavigationError::InvalidArgument(
                        "click event's current target is not a link".to_string(),
                    )
                })?;
                event.prevent_default();
                Ok(href)
            }
            NavigationTarget::Element(element) => non_empty(element.href()).ok_or_else(|| {
                NavigationError::InvalidArgument("call context is not a link".to_string())
            }),
        }
    }
}

impl<'a> From<&'a str> for NavigationTarget<'a> {
    fn from(url: &'a str) -> Self {
        NavigationTarget::Url(url)
    }
}

impl<'a> From<&'a String> for NavigationTarget<'a> {
    fn from(url: &'a String) -> Self {
        NavigationTarget::Url(url)
    }
}

impl<'a> TryFrom<&'a Value> for NavigationTarget<'a> {
    type Error = NavigationError;

    fn try_from(value: &'a Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl std::fmt::Debug for NavigationTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationTarget::Url(url) => f.debug_tuple("Url").field(url).finish(),
            NavigationTarget::Click(event) => {
                f.debug_tuple("Click").field(&event.link_href()).finish()
            }
            NavigationTarget::Element(element) => {
                f.debug_tuple("Element").field(&element.href()).finish()
            }
        }
    }
}

fn non_empty(href: Option<String>) -> Option<String> {
    href.filter(|h| !h.is_empty())
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let url = json!("/somewhere");
        assert!(matches!(
            NavigationTarget::from_value(&url),
            Ok(NavigationTarget::Url("/somewhere"))
        ));

        let link = json!({"href": "/somewhere"});
        assert_eq!(
            NavigationTarget::from_value(&link)
                .unwrap()
                .into_destination()
                .unwrap(),
            "/somewhere"
        );

        for bad in [json!(null), json!(1234), json!(true), json!(["/a"])] {
            assert!(matches!(
                NavigationTarget::from_value(&bad),
                Err(NavigationError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_non_link_context() {
        let context = json!({});
        let target = NavigationTarget::from_value(&context).unwrap();
        assert!(matches!(
            target.into_destination(),
            Err(NavigationError::InvalidArgument(_))
        ));

        let anchor = Anchor::new("");
        assert!(NavigationTarget::Element(&anchor).into_destination().is_err());
    }

    #[test]
    fn test_click_prevents_default() {
        let mut click = LinkClick::on(Anchor::new("/a#b"));
        let destination = NavigationTarget::Click(&mut click).into_destination().unwrap();
        assert_eq!(destination, "/a#b");
        assert!(click.default_prevented());
    }

    #[test]
    fn test_click_without_link_is_left_alone() {
        let mut click = LinkClick::default();
        assert!(NavigationTarget::Click(&mut click).into_destination().is_err());
        assert!(!click.default_prevented());
    }

    #[test]
    fn test_empty_string_is_a_url() {
        assert_eq!(NavigationTarget::from("").into_destination().unwrap(), "");
    }
}

//! Interceptor State Machine
//!
//! ```text
//! Uninstalled
//!   ↓ install
//! Installed
//! ```
//!
//! There is no uninstall path: the page lifetime is the process lifetime.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterceptorState {
    /// Native primitives are untouched
    #[default]
    Uninstalled,
    /// Push/replace are wrapped and notify on every call
    Installed,
}

impl InterceptorState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: InterceptorState) -> bool {
        match (self, target) {
            (InterceptorState::Uninstalled, InterceptorState::Installed) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, InterceptorState::Installed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterceptorState::Uninstalled => "uninstalled",
            InterceptorState::Installed => "installed",
        }
    }
}

impl std::fmt::Display for InterceptorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InterceptorState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uninstalled" => Ok(InterceptorState::Uninstalled),
            "installed" => Ok(InterceptorState::Installed),
            _ => Err(format!("Unknown interceptor state: {}", s)),
        }
    }
}

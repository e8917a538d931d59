//! History error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The URL passed to a history primitive is not same-origin with the document.
    #[error("Security error: {url} is not same-origin with {origin}")]
    Security { url: String, origin: String },

    #[error("Invalid URL: {0}")]
    Syntax(String),

    #[error("Unreadable location: {0}")]
    Location(String),

    /// Exception raised by a host primitive, carried verbatim.
    #[error("Native history call failed: {0}")]
    Native(String),
}

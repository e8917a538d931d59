//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid navigation argument: {0}")]
    InvalidArgument(String),

    #[error("History error: {0}")]
    History(#[from] waypost_history::HistoryError),
}

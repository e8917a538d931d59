//! Waypost Core
//!
//! Shared-URL coordination for independently deployed front-end
//! applications. One browser URL and one history stack; every change to
//! them, whoever makes it, ends up as a reroute request for the routing
//! layer. Only cross-origin navigation reloads the page.

mod config;
mod error;
mod navigator;

pub use config::Config;
pub use error::CoreError;
pub use navigator::{Navigator, RerouteHandler};

// Re-export core components
pub use waypost_history::{
    BrowserHost, EventKind, HashChangeEvent, HistoryError, HistoryPrimitives, InstallOutcome,
    InterceptorState, Listener, ListenerId, Location, MemoryBrowser, PopStateEvent, WindowEvent,
};
pub use waypost_navigation::{
    navigate_to_url, Anchor, ClickEvent, LinkClick, LinkElement, NavigateOptions,
    NavigationDecision, NavigationError, NavigationOutcome, NavigationPlan, NavigationTarget,
    ReloadReport,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// `RUST_LOG` wins over the configured filter.
fn log_filter(config: &Config) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter))
}

/// Subscriber writing plain, untimestamped lines to `writer`. wasm32 has no
/// system clock, so timestamps are left to the sink.
pub fn log_subscriber<W>(
    config: &Config,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_target(true)
        .without_time()
        .with_ansi(false)
        .with_writer(writer)
        .finish()
}

/// Initialize logging with [`log_subscriber`]. Returns false when a global
/// subscriber was already installed.
pub fn init_logging<W>(config: &Config, writer: W) -> bool
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(log_subscriber(config, writer)).is_ok()
}

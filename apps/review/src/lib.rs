//! ExHub flashcard review service: SQLite-backed storage around the
//! srs-core scheduler.

pub mod config;
pub mod db;
pub mod error;
pub mod service;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::Config;
pub use error::{Result, ServiceError};
pub use service::{ReviewOutcome, ReviewService};

/// Initialize tracing output. `RUST_LOG` overrides `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

//! indexd - a positional lookup service over a sorted integer dataset
//!
//! indexd keeps a single sorted sequence of integers in memory, rebuilds it
//! from a dataset file on a fixed interval, and answers point lookups over
//! HTTP. Lookups use an approximate binary search that accepts the nearest
//! value within a relative tolerance when no exact match exists.
#![warn(missing_docs)]

// Configure global allocator for maximum performance
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

// Core foundational modules
pub mod core;

// Main functional modules
pub mod api;
pub mod index;
pub mod system;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize the service with tracing and metrics
///
/// `log_level` is the configured default; the `RUST_LOG` environment
/// variable still takes precedence when set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Initializing {} v{}", NAME, VERSION);

    // Initialize metrics registry
    system::metrics::init_registry();

    Ok(())
}

//! VirtualWisdom entity import tools
//!
//! Converts CSV inventories (WWN nicknames, entity relations) into the VW
//! entity import JSON format and imports such files through the appliance
//! REST API.

pub mod api;
pub mod cli;
pub mod config;
pub mod convert;
pub mod credentials;
pub mod error;
pub mod import;
pub mod models;

pub use error::{AppError, Result};

/// Initialize logging; `RUST_LOG` overrides the default level
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(level.into()).from_env_lossy())
        .init();
}

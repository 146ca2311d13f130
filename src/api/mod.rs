//! API client module

pub mod client;
pub mod endpoints;

pub use client::{ApiTransport, ClientOptions, VwClient};

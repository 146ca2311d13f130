//! Data models for import documents and appliance responses

pub mod common;
pub mod entity;
pub mod envelope;
pub mod properties;

pub use common::*;
pub use entity::*;
pub use envelope::*;
pub use properties::*;

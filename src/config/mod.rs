//! Settings and saved appliance profiles

pub mod settings;

pub use settings::{ImportDefaults, Profile, Settings};

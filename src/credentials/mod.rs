//! API token storage

pub mod keyring;

pub use self::keyring::CredentialStore;

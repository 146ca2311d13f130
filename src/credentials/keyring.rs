//! OS-native API token storage with file-based fallback
//!
//! Tokens live in the system keychain (Credential Manager, Keychain, Secret
//! Service). When the keychain is unavailable they go to an obfuscated JSON
//! file in the data directory instead.

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const SERVICE_NAME: &str = "vw-import-tools";

/// Get the credentials file path
fn creds_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "virtualinstruments", "vw-import-tools")
        .map(|dirs| dirs.data_dir().join("credentials.json"))
}

/// Obfuscate a token (XOR with the service key, then base64).
/// Keeps tokens from being read at a glance; it is not encryption.
fn obfuscate(data: &str) -> String {
    let key = SERVICE_NAME.as_bytes();
    let obfuscated: Vec<u8> = data
        .bytes()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect();
    BASE64.encode(obfuscated)
}

fn deobfuscate(data: &str) -> Option<String> {
    let key = SERVICE_NAME.as_bytes();
    let decoded = BASE64.decode(data).ok()?;
    let plain: Vec<u8> = decoded
        .iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect();
    String::from_utf8(plain).ok()
}

/// File fallback keyed by profile name
struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn save(&self, creds: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Credential(format!("Failed to create credentials directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(creds)
            .map_err(|e| AppError::Credential(format!("Failed to serialize credentials: {}", e)))?;
        fs::write(&self.path, json).map_err(|e| {
            AppError::Credential(format!("Failed to write credentials file: {}", e))
        })?;
        tracing::debug!("Saved credentials to file: {:?}", self.path);
        Ok(())
    }

    fn store(&self, profile_name: &str, token: &str) -> Result<()> {
        let mut creds = self.load();
        creds.insert(profile_name.to_string(), obfuscate(token));
        self.save(&creds)
    }

    fn get(&self, profile_name: &str) -> Option<String> {
        self.load().get(profile_name).and_then(|t| deobfuscate(t))
    }

    fn delete(&self, profile_name: &str) -> Result<()> {
        let mut creds = self.load();
        if creds.remove(profile_name).is_some() {
            self.save(&creds)?;
        }
        Ok(())
    }
}

fn fallback_file() -> Result<TokenFile> {
    creds_file()
        .map(|path| TokenFile::at(&path))
        .ok_or_else(|| AppError::Credential("Could not determine data directory".into()))
}

/// Token manager using OS keychain with file fallback
pub struct CredentialStore;

impl CredentialStore {
    /// Store an API token for a profile (keyring first, then file fallback)
    pub fn store_token(profile_name: &str, token: &str) -> Result<()> {
        match Self::store_token_keyring(profile_name, token) {
            Ok(()) if Self::get_token_keyring(profile_name).ok().flatten().as_deref() == Some(token) => {
                tracing::info!("API token stored in system keyring");
                return Ok(());
            }
            Ok(()) => tracing::warn!("Keyring store succeeded but verification failed, using file fallback"),
            Err(e) => tracing::warn!("Keyring store failed, using file fallback: {}", e),
        }

        tracing::warn!(
            "Storing API token for '{}' in the file fallback with basic obfuscation only",
            profile_name
        );
        fallback_file()?.store(profile_name, token)
    }

    fn store_token_keyring(profile_name: &str, token: &str) -> Result<()> {
        let entry = keyring::Entry::new(SERVICE_NAME, profile_name)
            .map_err(|e| AppError::Credential(format!("Failed to create keyring entry: {}", e)))?;

        entry
            .set_password(token)
            .map_err(|e| AppError::Credential(format!("Failed to store token in keyring: {}", e)))
    }

    /// Retrieve the API token for a profile (keyring first, then file fallback)
    pub fn get_token(profile_name: &str) -> Result<Option<String>> {
        if let Ok(Some(token)) = Self::get_token_keyring(profile_name) {
            tracing::debug!("Found API token in system keyring");
            return Ok(Some(token));
        }

        Ok(fallback_file()?.get(profile_name))
    }

    fn get_token_keyring(profile_name: &str) -> Result<Option<String>> {
        let entry = keyring::Entry::new(SERVICE_NAME, profile_name)
            .map_err(|e| AppError::Credential(format!("Failed to create keyring entry: {}", e)))?;

        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::Credential(format!("Failed to retrieve token: {}", e))),
        }
    }

    /// Delete the API token for a profile from both keyring and file
    pub fn delete_token(profile_name: &str) -> Result<()> {
        if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, profile_name) {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => tracing::warn!("Failed to delete token from keyring: {}", e),
            }
        }

        fallback_file()?.delete(profile_name)
    }

    pub fn has_token(profile_name: &str) -> bool {
        Self::get_token(profile_name)
            .map(|opt| opt.is_some())
            .unwrap_or(false)
    }
}

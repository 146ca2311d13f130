//! Application settings and appliance profiles

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::ClientOptions;
use crate::error::{AppError, Result};
use crate::import::PollPolicy;

/// A saved VirtualWisdom appliance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile name (e.g., "lab", "production")
    pub name: String,
    /// Appliance host name or IP address
    pub host: String,
    /// Validate the appliance TLS certificate
    #[serde(default)]
    pub verify_tls: bool,
    /// Last used timestamp (RFC 3339)
    #[serde(default)]
    pub last_used: Option<String>,
}

impl Profile {
    /// Create a new profile
    pub fn new(name: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            verify_tls: false,
            last_used: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_used = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Defaults applied to import runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportDefaults {
    pub poll_interval_secs: u64,
    /// 0 polls without limit
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            max_poll_attempts: 600,
            request_timeout_secs: 60,
        }
    }
}

impl ImportDefaults {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_attempts: (self.max_poll_attempts > 0).then_some(self.max_poll_attempts),
        }
    }

    pub fn client_options(&self, verify_tls: bool) -> ClientOptions {
        ClientOptions {
            accept_invalid_certs: !verify_tls,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// List of saved profiles
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// Name of the active profile
    pub active_profile: Option<String>,
    #[serde(default)]
    pub import: ImportDefaults,
}

impl Settings {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "virtualinstruments", "vw-import-tools")
            .ok_or_else(|| AppError::Config("Could not determine config directory".into()))?;

        Ok(dirs.config_dir().join("settings.json"))
    }

    /// Load settings from disk
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path()?)
    }

    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Find a profile by name
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn profile_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }

    /// Add a new profile, replacing one with the same name
    pub fn add_profile(&mut self, profile: Profile) {
        self.profiles.retain(|p| p.name != profile.name);
        self.profiles.push(profile);
    }

    /// Delete a profile by name
    pub fn delete_profile(&mut self, name: &str) {
        self.profiles.retain(|p| p.name != name);

        // Clear active profile if it was deleted
        if self.active_profile.as_deref() == Some(name) {
            self.active_profile = self.profiles.first().map(|p| p.name.clone());
        }
    }

    /// Set the active profile
    pub fn set_active_profile(&mut self, name: &str) -> Result<()> {
        if self.profile(name).is_none() {
            return Err(AppError::Config(format!("Profile '{}' not found", name)));
        }
        self.active_profile = Some(name.to_string());
        Ok(())
    }
}

//! Error types for the VirtualWisdom import tools

use thiserror::Error;

use crate::import::Phase;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Conversion error: {0}")]
    Convert(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the appliance HTTP client
#[derive(Error, Debug)]
pub enum ClientError {
    /// No HTTP response was received (refused, timeout, DNS, TLS)
    #[error("An exception was caught connecting to VW. {0}")]
    Transport(String),

    /// The appliance answered with something other than 200
    #[error("{method} to {endpoint} failed with status code {status} ({message})")]
    Status {
        method: String,
        endpoint: String,
        status: u16,
        message: String,
        /// Parsed response body, kept so callers can look for diagnostics
        body: Option<serde_json::Value>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

/// Failure kinds of one entity import run
#[derive(Error, Debug)]
pub enum ImportError {
    /// The import document was rejected locally; nothing was sent
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Transport(String),

    /// The appliance refused the request or reported a failed import
    #[error("{phase} failed: {}", primary(.diagnostics))]
    RemoteRejected {
        phase: Phase,
        diagnostics: Vec<String>,
    },

    /// The appliance reported success but left out a field the next step needs
    #[error("{phase} returned an unexpected response: {detail}")]
    Inconsistent { phase: Phase, detail: String },

    #[error("Import still busy after {attempts} status checks; giving up")]
    Timeout { attempts: u32 },

    #[error("Import cancelled while waiting for the appliance")]
    Cancelled,
}

impl ImportError {
    /// Detail lines that follow the primary message, if any
    pub fn details(&self) -> &[String] {
        match self {
            ImportError::RemoteRejected { diagnostics, .. } if diagnostics.len() > 1 => {
                &diagnostics[1..]
            }
            _ => &[],
        }
    }
}

fn primary(diagnostics: &[String]) -> &str {
    diagnostics.first().map(String::as_str).unwrap_or("no diagnostic returned")
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for ClientError
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Result type alias for ImportError
pub type ImportResult<T> = std::result::Result<T, ImportError>;

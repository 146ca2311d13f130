//! Response envelopes of the entitiesimport endpoints.
//!
//! The appliance answers with several overlapping shapes:
//!
//! - start: `{status, result: {transactionId, entities: [{marker, name, type}]}, error: {message}}`
//! - commit: `{status, errors: {message}}`
//! - status: `{success, status: "Busy", errors: {message}}`
//!
//! Every field is optional and parsed leniently, so a field of the wrong
//! JSON type reads as absent rather than failing the whole envelope.

use serde::{Deserialize, Serialize};

use super::common::{lenient, lenient_scalar, lenient_vec, TransactionId};

/// Business status value for an accepted request
pub const STATUS_OK: &str = "OK";
/// Status value while the appliance is still processing
pub const STATUS_BUSY: &str = "Busy";

/// Union of the fields any entitiesimport response may carry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<EnvelopeResult>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<ErrorDetail>,
    #[serde(default, deserialize_with = "lenient")]
    pub errors: Option<ErrorList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeResult {
    #[serde(default, deserialize_with = "lenient")]
    pub transaction_id: Option<TransactionId>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub entities: Option<Vec<EntityReport>>,
}

/// `{code, message}` error object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub message: Option<String>,
}

/// `errors` comes back either as one object or as a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorList {
    Many(Vec<ErrorDetail>),
    One(ErrorDetail),
}

impl ErrorList {
    pub fn iter(&self) -> impl Iterator<Item = &ErrorDetail> {
        let items: &[ErrorDetail] = match self {
            ErrorList::One(detail) => std::slice::from_ref(detail),
            ErrorList::Many(details) => details,
        };
        items.iter()
    }
}

/// Per-entity validation result from `start`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityReport {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_scalar")]
    pub entity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Marker {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub line: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub column: Option<String>,
}

/// Body of commit and discard requests
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest<'a> {
    #[serde(rename = "async")]
    pub is_async: bool,
    /// Serialized as `null` when start handed back no id
    pub transaction_id: Option<&'a TransactionId>,
}

impl<'a> TransactionRequest<'a> {
    pub fn new(transaction_id: Option<&'a TransactionId>) -> Self {
        Self {
            is_async: true,
            transaction_id,
        }
    }
}

impl Envelope {
    /// Read an envelope out of any response body; non-objects yield an empty envelope
    pub fn from_value(body: &serde_json::Value) -> Self {
        if !body.is_object() {
            return Self::default();
        }
        Self::deserialize(body).unwrap_or_default()
    }

    /// `status == "OK"`
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some(STATUS_OK)
    }

    /// `success == false` together with `status == "Busy"`
    pub fn is_busy(&self) -> bool {
        self.success == Some(false) && self.status.as_deref() == Some(STATUS_BUSY)
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.result.as_ref()?.transaction_id.as_ref()
    }

    /// Collect every human-readable diagnostic the envelope carries, in order:
    /// `error.message`, then `errors` messages, then per-entity markers as
    /// message / location / entity lines.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut messages = Vec::new();

        if let Some(message) = self.error.as_ref().and_then(|e| e.message.as_ref()) {
            messages.push(message.clone());
        }

        if let Some(errors) = &self.errors {
            for detail in errors.iter() {
                match (&detail.code, &detail.message) {
                    (Some(code), Some(message)) => messages.push(format!("{} ; {}", code, message)),
                    (None, Some(message)) => messages.push(message.clone()),
                    _ => {}
                }
            }
        }

        let entities = self
            .result
            .as_ref()
            .and_then(|r| r.entities.as_deref())
            .unwrap_or_default();

        for entity in entities {
            let Some(marker) = &entity.marker else {
                continue;
            };
            let (Some(message), Some(location)) = (&marker.message, &marker.location) else {
                continue;
            };
            let (Some(line), Some(column)) = (&location.line, &location.column) else {
                continue;
            };

            messages.push(format!("  Message: {}", message));
            messages.push(format!("  Location: line {} column {}", line, column));
            messages.push(format!(
                "  Entity: name = {}, type = {}",
                entity.name.as_deref().unwrap_or(""),
                entity.entity_type.as_deref().unwrap_or("")
            ));
        }

        messages
    }
}

//! VirtualWisdom REST API client
//!
//! Thin authenticated wrapper over reqwest. Every call is normalized into
//! either the parsed body of a 200 response or a [`ClientError`] carrying a
//! printable diagnostic.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::endpoints::{paths, EntityQuery};
use crate::error::{ClientError, ClientResult};
use crate::models::EntityRecord;

/// Capability to issue one authenticated request against the appliance.
///
/// `VwClient` is the network implementation; the import orchestrator is
/// generic over this so it can be driven without an appliance.
#[allow(async_fn_in_trait)]
pub trait ApiTransport {
    async fn request<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> ClientResult<Value>
    where
        B: Serialize + ?Sized + Sync;
}

/// Connection options for [`VwClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Skip TLS certificate validation (appliances ship self-signed certs)
    pub accept_invalid_certs: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            timeout: Duration::from_secs(60),
        }
    }
}

/// VirtualWisdom API client
#[derive(Clone)]
pub struct VwClient {
    /// HTTP client, one connection pool per invocation
    http: reqwest::Client,
    /// Appliance host name or address, without scheme
    host: String,
    /// API token generated from the VW UI
    token: String,
}

impl VwClient {
    /// Create a new client
    pub fn new(host: &str, token: &str, options: &ClientOptions) -> ClientResult<Self> {
        if options.accept_invalid_certs {
            tracing::debug!("TLS certificate validation disabled for {}", host);
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            host: normalize_host(host),
            token: token.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, endpoint: &str) -> String {
        format!("https://{}{}", self.host, endpoint)
    }

    /// Make a GET request
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> ClientResult<Value> {
        self.request::<()>(Method::GET, endpoint, None, query).await
    }

    /// Authenticated request with its query string and JSON body attached
    fn build_request<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> ClientResult<reqwest::Request>
    where
        B: Serialize + ?Sized,
    {
        let is_get = method == Method::GET;
        let mut builder = self
            .http
            .request(method, self.url(endpoint))
            .header(AUTHORIZATION, format!("bearer {}", self.token));

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if !is_get {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.build()?)
    }

    // ==================== API Methods ====================

    /// List entities of one type as flat property maps
    pub async fn get_entities(
        &self,
        query: &EntityQuery,
    ) -> ClientResult<Vec<std::collections::BTreeMap<String, Value>>> {
        let body = self.get(paths::ENTITIES, &query.to_pairs()).await?;
        let records: Vec<EntityRecord> = serde_json::from_value(body).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "Could not read entities of type {}: {}",
                query.kind, e
            ))
        })?;

        Ok(records.into_iter().map(EntityRecord::into_map).collect())
    }
}

impl ApiTransport for VwClient {
    async fn request<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> ClientResult<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.build_request(method.clone(), endpoint, body, query)?;
        tracing::debug!("{} {}", method, request.url());

        let response = self.http.execute(request).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        tracing::debug!(
            "{} {} -> {}: {}",
            method,
            endpoint,
            status,
            &text[..floor_char_boundary(&text, 500)]
        );

        interpret_response(&method, endpoint, status, &text)
    }
}

/// Strip any scheme or trailing slash the user typed around the host
fn normalize_host(host: &str) -> String {
    host.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

fn floor_char_boundary(text: &str, max: usize) -> usize {
    let mut end = text.len().min(max);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Turn a raw HTTP outcome into a body or a diagnostic.
///
/// Bodies that are not JSON are kept as a JSON string. Anything but 200 is a
/// failure; its message comes from the first entry of an `errors` array when
/// there is one, the raw body otherwise.
pub fn interpret_response(
    method: &Method,
    endpoint: &str,
    status: u16,
    text: &str,
) -> ClientResult<Value> {
    let parsed: Option<Value> = serde_json::from_str(text).ok();

    if status == 200 {
        return Ok(parsed.unwrap_or_else(|| Value::String(text.to_string())));
    }

    let first_error = parsed
        .as_ref()
        .and_then(|v| v.get("errors"))
        .and_then(Value::as_array)
        .and_then(|errors| errors.first());

    let message = match first_error {
        Some(error) => format!(
            "{} ; {}",
            scalar_text(error.get("code")),
            scalar_text(error.get("message"))
        ),
        None => text.to_string(),
    };

    Err(ClientError::Status {
        method: method.to_string(),
        endpoint: endpoint.to_string(),
        status,
        message,
        body: parsed,
    })
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

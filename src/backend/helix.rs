//! `HelixDB` HTTP client.
//!
//! Queries are sent as `POST {base_url}/{query}` with a JSON body.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{Document, DocumentStore};
use crate::error::BackendError;
use crate::Result;

/// Query that stores a document.
pub const ADD_DOCUMENT_QUERY: &str = "AddDocument";

/// Query used as a liveness probe.
pub const HEALTH_QUERY: &str = "GetHealth";

/// HTTP client for a `HelixDB` instance.
#[derive(Debug, Clone)]
pub struct HelixClient {
    http: reqwest::Client,
    base_url: String,
}

impl HelixClient {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the backend.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a named query and return its JSON result.
    ///
    /// An empty response body is returned as `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// undecodable body.
    pub async fn query<T: Serialize + Sync>(&self, name: &str, payload: &T) -> Result<Value> {
        let url = format!("{}/{name}", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()).into())
    }
}

#[async_trait]
impl DocumentStore for HelixClient {
    async fn submit(&self, document: &Document) -> Result<()> {
        let result = self.query(ADD_DOCUMENT_QUERY, document).await?;

        if is_empty_result(&result) {
            return Err(BackendError::EmptyResponse {
                query: ADD_DOCUMENT_QUERY.to_string(),
            }
            .into());
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.query(HEALTH_QUERY, &serde_json::json!({}))
            .await
            .map(|_| ())
            .map_err(|e| BackendError::connection(&self.base_url, e.to_string()).into())
    }
}

/// Null, `false`, and empty strings, arrays or objects count as no result.
fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(true) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_results() {
        assert!(is_empty_result(&Value::Null));
        assert!(is_empty_result(&json!(false)));
        assert!(is_empty_result(&json!("")));
        assert!(is_empty_result(&json!([])));
        assert!(is_empty_result(&json!({})));

        assert!(!is_empty_result(&json!(true)));
        assert!(!is_empty_result(&json!(0)));
        assert!(!is_empty_result(&json!({"id": "doc_1"})));
        assert!(!is_empty_result(&json!(["doc_1"])));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HelixClient::new("http://localhost:6969/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:6969");
    }
}

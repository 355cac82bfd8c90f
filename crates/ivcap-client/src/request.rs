//! Transport-neutral request and response descriptors.
//!
//! Endpoint modules build a [`RequestParts`] once; the async and blocking
//! clients only differ in how they put it on the wire. The raw
//! [`HttpResponse`] is handed back to the endpoint's status-dispatch table.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// A fully described request, not yet bound to a transport.
#[derive(Debug, Clone)]
pub struct RequestParts {
    pub method: Method,
    /// Path relative to the deployment base URL, e.g. `1/services/{id}`
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    /// Optional JSON body
    pub body: Option<Value>,
}

impl RequestParts {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter when a value is present.
    pub fn query_opt(mut self, name: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((name, value.to_string()));
        }
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Resolve the absolute request URL against a deployment base URL.
    pub fn url(&self, base_url: &Url) -> Result<Url> {
        base_url.join(&self.path).map_err(Error::from)
    }
}

/// Raw response handed to an endpoint's `parse` function.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decode the body as JSON, labelling decode failures with the payload
    /// kind for error messages.
    pub fn json<T: DeserializeOwned>(&self, context: &'static str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::json(context, e))
    }
}

//! Request building, response parsing and error mapping
//!
//! Both clients go through the same three steps:
//!
//! 1. [`WireRequest::build`]: URL, fixed headers, serialized body.
//! 2. send: the only step that differs between blocking and async.
//! 3. [`parse_response`]: status check, error envelope, strict body validation.
//!
//! Transport errors from step 2 are classified by [`map_transport_error`].

use crate::config::{API_VERSION, API_VERSION_HEADER, ClientOptions};
use crate::error::{SERVER_ERROR, UNPARSEABLE_ERROR_MESSAGE};
use crate::{Error, Result};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A fully prepared HTTP request, independent of the transport that sends it.
#[derive(Debug, Clone)]
pub(crate) struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// Serialized JSON body; `None` for bodiless calls such as listings.
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl WireRequest {
    /// Attach the fixed headers; `body` is already-serialized JSON.
    pub fn build(
        options: &ClientOptions,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", options.api_key()))
            .map_err(|_| Error::config("api_key contains characters not allowed in a header"))?;
        headers.insert(AUTHORIZATION, bearer);
        // from_bytes lowercases; inserting the mixed-case &'static str would panic.
        let version_header = HeaderName::from_bytes(API_VERSION_HEADER.as_bytes())
            .map_err(|e| Error::config(format!("invalid header name: {e}")))?;
        headers.insert(version_header, HeaderValue::from_static(API_VERSION));

        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(Self {
            method,
            url: options.endpoint_url(path),
            headers,
            body,
            timeout: options.timeout(),
        })
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    #[serde(default)]
    trace: Option<String>,
}

/// Turn a completed exchange into a typed response or a classified error.
///
/// - non-200 with a valid error envelope: [`Error::Api`] with the real status
///   and the server's type and message;
/// - non-200 otherwise: [`Error::Api`] with the real status, `server_error`
///   and a fixed message;
/// - 200 whose body does not validate as `T`: [`Error::ResponseValidation`]
///   with status 500.
pub(crate) fn parse_response<T: DeserializeOwned>(raw: RawResponse) -> Result<T> {
    if raw.status != 200 {
        return Err(match serde_json::from_slice::<ErrorEnvelope>(&raw.body) {
            Ok(envelope) => {
                log::debug!(
                    "API error {} {}: {} (trace: {})",
                    raw.status,
                    envelope.error.error_type,
                    envelope.error.message,
                    envelope.error.trace.as_deref().unwrap_or("-")
                );
                Error::api(raw.status, envelope.error.error_type, envelope.error.message)
            }
            Err(e) => {
                log::warn!("Unparseable error body for status {}: {}", raw.status, e);
                Error::api(raw.status, SERVER_ERROR, UNPARSEABLE_ERROR_MESSAGE)
            }
        });
    }

    serde_json::from_slice::<T>(&raw.body).map_err(|e| {
        log::warn!(
            "Response did not match {}: {}",
            std::any::type_name::<T>(),
            e
        );
        Error::response_validation()
    })
}

/// Classify a transport failure: timeouts become [`Error::Timeout`], anything
/// else is passed through as [`Error::Http`].
pub(crate) fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        log::debug!("Request timed out: {}", err);
        Error::timeout()
    } else {
        Error::Http(err)
    }
}

//! Non-blocking client
//!
//! [`Client`] exposes one `async` method per remote capability of the
//! Artificial Agency API. Every method issues exactly one HTTP exchange and
//! returns either the parsed response or a classified [`Error`].
//!
//! # Request Flow
//!
//! ```text
//! client.generate_text(session, agent, &request)
//!     │
//!     ├─> operations::generate_text()   method, path, body (NotGiven fields dropped)
//!     │
//!     ├─> WireRequest::build()           URL, Authorization + AA-API-Version headers
//!     │
//!     ├─> reqwest send + read body       per-request timeout
//!     │     └─> timeout?                 Error::Timeout (500, "Request timed out.")
//!     │
//!     └─> parse_response()
//!           ├─> status != 200            Error::Api (real status, server type/message)
//!           ├─> body doesn't validate    Error::ResponseValidation (500)
//!           └─> Ok(T)
//! ```
//!
//! # State
//!
//! The client holds only the [`ClientOptions`] captured at construction and a
//! pooled `reqwest::Client`. It is `Clone + Send + Sync`; clones share the
//! connection pool, and concurrent calls from many tasks need no locking.
//!
//! # Cancellation
//!
//! Dropping a returned future (for example when it loses a `tokio::select!`
//! or is wrapped in `tokio::time::timeout`) drops the in-flight `reqwest`
//! request with it; nothing keeps running in the background.
//!
//! # Example
//!
//! ```rust,no_run
//! use artificial_agency::{Client, CreateSessionRequest, GenerateTextRequest, ContentMessage};
//!
//! # async fn example(agent_id: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("YOUR API KEY")?;
//!
//! let session = client
//!     .create_session(&CreateSessionRequest::new("proj_1234"))
//!     .await?;
//!
//! let reply = client
//!     .generate_text(
//!         &session.id,
//!         agent_id,
//!         &GenerateTextRequest::new().messages([ContentMessage::new("Hello!")]),
//!     )
//!     .await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

use crate::config::ClientOptions;
use crate::operations::{self, ApiCall};
use crate::requests::{
    AddMessagesRequest, CloneSessionRequest, CreateAgentRequest, CreateSessionRequest,
    GenerateFunctionCallRequest, GenerateJsonRequest, GenerateTextRequest,
};
use crate::responses::{
    Agent, FunctionCallGenerated, HistoryUpdated, JsonGenerated, MessagesAdded, Service, Session,
    TextGenerated,
};
use crate::wire::{RawResponse, WireRequest, map_transport_error, parse_response};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Asynchronous Artificial Agency API client.
///
/// Cheap to clone; clones share the connection pool. For a client that blocks
/// the calling thread instead, use [`crate::blocking::Client`].
#[derive(Clone)]
pub struct Client {
    /// Credential, base address and timeout. Never changes after construction.
    options: Arc<ClientOptions>,

    /// Reusable HTTP client.
    ///
    /// Either built by the client or injected through
    /// [`Client::with_http_client`]. The configured timeout is applied to each
    /// request individually, so it holds for injected transports too.
    http_client: reqwest::Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the production API with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `api_key` is empty. No network activity
    /// happens before this check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use artificial_agency::{Client, Error};
    ///
    /// let err = Client::new("").unwrap_err();
    /// assert!(matches!(err, Error::Config(_)));
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(ClientOptions::new(api_key)?)
    }

    /// Creates a client from explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use artificial_agency::{Client, ClientOptions};
    /// use std::time::Duration;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let options = ClientOptions::builder()
    ///     .api_key("YOUR API KEY")
    ///     .base_url("http://localhost:8000")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()?;
    /// let client = Client::with_options(options)?;
    /// assert_eq!(client.options().timeout(), Duration::from_secs(10));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(options, http_client))
    }

    /// Creates a client that sends through a caller-supplied `reqwest::Client`.
    ///
    /// Useful for sharing a connection pool, adding proxies, or tests.
    pub fn with_http_client(options: ClientOptions, http_client: reqwest::Client) -> Self {
        Self {
            options: Arc::new(options),
            http_client,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists all services available to your organization.
    ///
    /// `GET /v1/services`
    pub async fn list_services(&self) -> Result<Vec<Service>> {
        let list = self.execute(operations::list_services()).await?;
        Ok(list.data)
    }

    /// Creates a new session.
    ///
    /// `POST /v1/sessions`
    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        self.execute(operations::create_session(request)?).await
    }

    /// Creates a new session from an existing session at a given moment.
    ///
    /// `POST /v1/sessions/{session_id}/clone`
    pub async fn clone_session(
        &self,
        session_id: &str,
        request: &CloneSessionRequest,
    ) -> Result<Session> {
        self.execute(operations::clone_session(session_id, request)?)
            .await
    }

    /// Creates a new agent within a session.
    ///
    /// `POST /v1/advanced/sessions/{session_id}/agents`
    pub async fn create_agent(
        &self,
        session_id: &str,
        request: &CreateAgentRequest,
    ) -> Result<Agent> {
        let response = self
            .execute(operations::create_agent(session_id, request)?)
            .await?;
        Ok(Agent::from(response))
    }

    /// Updates the agent state with new messages, without generating.
    ///
    /// `POST /v1/sessions/{session_id}/agents/{agent_id}/messages`
    pub async fn add_messages(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &AddMessagesRequest,
    ) -> Result<MessagesAdded> {
        self.execute(operations::add_messages(session_id, agent_id, request)?)
            .await
    }

    /// Same request as [`Client::add_messages`], kept for older callers.
    #[deprecated(note = "use `add_messages` instead")]
    pub async fn update_history(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &AddMessagesRequest,
    ) -> Result<HistoryUpdated> {
        log::warn!(
            "update_history is deprecated and will be removed in a future version. Use add_messages instead."
        );
        self.execute(operations::update_history(session_id, agent_id, request)?)
            .await
    }

    /// Asks the agent to generate free-form text.
    ///
    /// `POST /v1/sessions/{session_id}/agents/{agent_id}/generate_text`
    pub async fn generate_text(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &GenerateTextRequest,
    ) -> Result<TextGenerated> {
        self.execute(operations::generate_text(session_id, agent_id, request)?)
            .await
    }

    /// Asks the agent to pick one of `request.functions` and its arguments.
    ///
    /// `POST /v1/sessions/{session_id}/agents/{agent_id}/generate_function_call`
    pub async fn generate_function_call(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &GenerateFunctionCallRequest,
    ) -> Result<FunctionCallGenerated> {
        self.execute(operations::generate_function_call(
            session_id, agent_id, request,
        )?)
        .await
    }

    /// Asks the agent for a JSON value satisfying `request.json_schema`.
    ///
    /// `POST /v1/sessions/{session_id}/agents/{agent_id}/generate_json`
    pub async fn generate_json(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &GenerateJsonRequest,
    ) -> Result<JsonGenerated> {
        self.execute(operations::generate_json(session_id, agent_id, request)?)
            .await
    }

    async fn execute<T: DeserializeOwned>(&self, call: ApiCall<T>) -> Result<T> {
        let wire = WireRequest::build(&self.options, call.method, &call.path, call.body)?;
        let raw = self.send(wire).await?;
        parse_response(raw)
    }

    async fn send(&self, wire: WireRequest) -> Result<RawResponse> {
        log::debug!(
            "{} {} ({})",
            wire.method,
            wire.url,
            if wire.body.is_some() { "json body" } else { "no body" }
        );

        let mut builder = self
            .http_client
            .request(wire.method, wire.url.as_str())
            .headers(wire.headers)
            .timeout(wire.timeout);
        if let Some(body) = wire.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        // The timeout also covers reading the body.
        let body = response.bytes().await.map_err(map_transport_error)?;
        log::debug!("{} -> {} ({} bytes)", wire.url, status, body.len());

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new("test-api-key").expect("Should create client successfully");
        assert_eq!(client.options().api_key(), "test-api-key");
        assert_eq!(
            client.options().base_url().host_str(),
            Some("api.artificial.agency")
        );
    }

    #[test]
    fn test_empty_api_key() {
        let err = Client::new("").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("api_key must not be empty"));
    }

    #[test]
    fn test_client_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<Client>();
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = Client::new("super-secret").unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[test]
    fn test_injected_http_client() {
        let options = ClientOptions::new("test-api-key").unwrap();
        let client = Client::with_http_client(options, reqwest::Client::new());
        assert_eq!(client.options().api_key(), "test-api-key");
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Bind then drop to get a port with nothing listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let options = ClientOptions::builder()
            .api_key("test-api-key")
            .base_url(format!("http://127.0.0.1:{port}"))
            .build()
            .unwrap();
        let client = Client::with_options(options).unwrap();

        let err = client.list_services().await.unwrap_err();
        assert!(matches!(err, Error::Http(_)), "got {err:?}");
        assert!(err.api_error().is_none());
    }
}

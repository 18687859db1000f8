//! Blocking client
//!
//! [`Client`] mirrors [`crate::Client`] operation for operation, but each call
//! suspends the calling thread for the full round trip. Request building and
//! error classification are shared with the async client; only the transport
//! differs.
//!
//! Like `reqwest::blocking`, this client must not be created or used from
//! inside an async runtime. Use [`crate::Client`] there.
//!
//! ```rust,no_run
//! use artificial_agency::blocking::Client;
//! use artificial_agency::CreateSessionRequest;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("YOUR API KEY")?;
//! let session = client.create_session(
//!     &CreateSessionRequest::new("proj_1234").metadata([("client", "docs")]),
//! )?;
//! println!("session {}", session.id);
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

/// Blocking Artificial Agency API client.
#[derive(Clone)]
pub struct Client {
    options: Arc<ClientOptions>,
    http_client: reqwest::blocking::Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Client")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the production API with default settings.
    ///
    /// Fails with [`Error::Config`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(ClientOptions::new(api_key)?)
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(options, http_client))
    }

    /// Creates a client that sends through a caller-supplied blocking client.
    pub fn with_http_client(
        options: ClientOptions,
        http_client: reqwest::blocking::Client,
    ) -> Self {
        Self {
            options: Arc::new(options),
            http_client,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists all services available to your organization.
    pub fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.execute(operations::list_services())?.data)
    }

    pub fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        self.execute(operations::create_session(request)?)
    }

    pub fn clone_session(
        &self,
        session_id: &str,
        request: &CloneSessionRequest,
    ) -> Result<Session> {
        self.execute(operations::clone_session(session_id, request)?)
    }

    pub fn create_agent(&self, session_id: &str, request: &CreateAgentRequest) -> Result<Agent> {
        let response = self.execute(operations::create_agent(session_id, request)?)?;
        Ok(Agent::from(response))
    }

    pub fn add_messages(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &AddMessagesRequest,
    ) -> Result<MessagesAdded> {
        self.execute(operations::add_messages(session_id, agent_id, request)?)
    }

    #[deprecated(note = "use `add_messages` instead")]
    pub fn update_history(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &AddMessagesRequest,
    ) -> Result<HistoryUpdated> {
        log::warn!(
            "update_history is deprecated and will be removed in a future version. Use add_messages instead."
        );
        self.execute(operations::update_history(session_id, agent_id, request)?)
    }

    pub fn generate_text(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &GenerateTextRequest,
    ) -> Result<TextGenerated> {
        self.execute(operations::generate_text(session_id, agent_id, request)?)
    }

    pub fn generate_function_call(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &GenerateFunctionCallRequest,
    ) -> Result<FunctionCallGenerated> {
        self.execute(operations::generate_function_call(
            session_id, agent_id, request,
        )?)
    }

    pub fn generate_json(
        &self,
        session_id: &str,
        agent_id: &str,
        request: &GenerateJsonRequest,
    ) -> Result<JsonGenerated> {
        self.execute(operations::generate_json(session_id, agent_id, request)?)
    }

    fn execute<T: DeserializeOwned>(&self, call: ApiCall<T>) -> Result<T> {
        let wire = WireRequest::build(&self.options, call.method, &call.path, call.body)?;
        let raw = self.send(wire)?;
        parse_response(raw)
    }

    fn send(&self, wire: WireRequest) -> Result<RawResponse> {
        log::debug!(
            "{} {} ({}, blocking)",
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

        let response = builder.send().map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(map_transport_error)?;
        log::debug!("{} -> {} ({} bytes)", wire.url, status, body.len());

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

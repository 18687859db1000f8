//! # Artificial Agency API client
//!
//! A typed Rust client for the Artificial Agency conversational-agent service.
//!
//! ## Overview
//!
//! The service hosts agents inside sessions. A game (or any other host
//! application) creates a session, creates one or more agents in it, feeds them
//! messages describing what happens, and asks them to respond in one of three
//! ways:
//!
//! - **free-form text** ([`Client::generate_text`])
//! - **a function call** chosen from a catalog you describe ([`Client::generate_function_call`])
//! - **a JSON value** satisfying a schema you supply ([`Client::generate_json`])
//!
//! Every call is a single HTTP exchange. There is no retry, no streaming and
//! no hidden state beyond the key, base address and timeout captured at
//! construction.
//!
//! ## Key Features
//!
//! - **Tri-state request fields**: [`Given`] tells "not sent" apart from an
//!   explicit `null`, so the wire payload contains exactly what you set.
//! - **Discriminated unions**: components, messages and function parameters
//!   are tagged enums; a variant can only be serialized with its discriminant.
//! - **Strict responses**: a success body that does not match its shape is an
//!   error, never a half-filled struct.
//! - **Classified errors**: timeouts, server errors and contract violations
//!   each get their own [`Error`] variant carrying status, type and message.
//! - **Async and blocking**: [`Client`] for async code, [`blocking::Client`]
//!   for everything else. Both share request building and error mapping.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artificial_agency::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(std::env::var("ARTIFICIAL_AGENCY_API_KEY")?)?;
//!
//!     let session = client
//!         .create_session(&CreateSessionRequest::new("proj_1234").metadata([("client", "quickstart")]))
//!         .await?;
//!
//!     let agent = client
//!         .create_agent(
//!             &session.id,
//!             &CreateAgentRequest::new(
//!                 RoleConfig::new("You are a friendly shopkeeper."),
//!                 PresentationConfig::default().item("history", "items"),
//!                 "llm_service",
//!             )
//!             .component(LimitedListConfig::new("history").setting("max_entries", 100)),
//!         )
//!         .await?;
//!
//!     let reply = client
//!         .generate_text(
//!             &agent.session_id,
//!             &agent.agent_id,
//!             &GenerateTextRequest::new().messages([ContentMessage::new("Hello there!")]),
//!         )
//!         .await?;
//!     println!("{}", reply.text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! ```rust,no_run
//! use artificial_agency::{Client, Error, GenerateTextRequest};
//!
//! # async fn example(client: Client) {
//! match client.generate_text("sess", "agent", &GenerateTextRequest::new()).await {
//!     Ok(reply) => println!("{}", reply.text),
//!     Err(Error::Timeout(e)) => eprintln!("gave up: {e}"),
//!     Err(e) if e.status_code() == Some(404) => eprintln!("no such agent"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **given**: the `Given<T>` tri-state used by request fields
//! - **variant**: `Family`/`Variant` traits for the tagged unions
//! - **types**: configuration, message and function-description shapes
//! - **requests** / **responses**: endpoint bodies
//! - **operations**: method, path and response type per endpoint
//! - **wire**: headers, serialization, response parsing and error mapping
//! - **config**: `ClientOptions` and its builder
//! - **client** / **blocking**: the two façades
//! - **error**: `Error`, `ApiError` and `Result<T>`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================
// Private unless re-exported below.

/// Non-blocking client.
mod client;

/// Client options, defaults and environment lookup.
mod config;

/// Error taxonomy and the `Result<T>` alias.
mod error;

/// Tri-state field model: not given, explicit null, or a value.
mod given;

/// One method/path/response description per remote operation.
mod operations;

/// Request bodies, serialize-only.
mod requests;

/// Response bodies, validated strictly on deserialize.
mod responses;

/// Nested configuration, message and function shapes.
mod types;

/// Discriminated union registry.
mod variant;

/// Request building and response classification shared by both clients.
mod wire;

// ============================================================================
// PUBLIC EXPORTS
// ============================================================================

/// Blocking client. Public as a module, mirroring `reqwest::blocking`.
pub mod blocking;

// --- Client ---

pub use client::Client;

// --- Configuration ---

pub use config::{
    API_VERSION, API_VERSION_HEADER, ClientOptions, ClientOptionsBuilder, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT,
};

// --- Error Handling ---

pub use error::{ApiError, Error, Result};

// --- Field Model ---

pub use given::Given;
pub use variant::{ConfigEntry, Family, Variant, discriminant_of, is_known_tag};

// --- Configuration Shapes ---

pub use types::{
    ArrayParameter, ComponentConfig, ContentMessage, FunctionDescription, FunctionHinterConfig,
    FunctionParameter, GameMessage, KVDelTreeMessage, KVMessage, KVStoreConfig, LimitedListConfig,
    ObjectParameter, PresentationConfig, PresentationOrderItem, PuppeteerKVStoreConfig,
    PuppeteerLimitedListConfig, PuppeteerMessage, RoleConfig, ServiceConfig, SimpleParameter,
    StaticTextConfig, TextBlockConfig, UIConfig,
};

// --- Requests ---

pub use requests::{
    AddMessagesRequest, CloneSessionRequest, CreateAgentRequest, CreateSessionRequest,
    GenerateFunctionCallRequest, GenerateJsonRequest, GenerateTextRequest, GenerationOptions,
};

// --- Responses ---

pub use responses::{
    Agent, CreateAgentResponse, FunctionCall, FunctionCallGenerated, HistoryUpdated,
    JsonGenerated, ListResponse, MessagesAdded, Service, Session, TextGenerated,
};

// ============================================================================
// CONVENIENCE PRELUDE
// ============================================================================

/// Commonly used types.
/// Import with `use artificial_agency::prelude::*;`.
///
/// This includes:
/// - Client: Client, ClientOptions
/// - Requests: the session, agent, message and generation requests
/// - Shapes: role/presentation config, the common components and messages
/// - Functions: FunctionDescription and its parameter kinds
/// - Errors: Error, Result
pub mod prelude {
    pub use crate::{
        AddMessagesRequest, ArrayParameter, Client, ClientOptions, CloneSessionRequest,
        ContentMessage, CreateAgentRequest, CreateSessionRequest, Error, FunctionDescription,
        GameMessage, GenerateFunctionCallRequest, GenerateJsonRequest, GenerateTextRequest, Given,
        KVStoreConfig, LimitedListConfig, ObjectParameter, PresentationConfig, Result, RoleConfig,
        SimpleParameter, StaticTextConfig,
    };
}

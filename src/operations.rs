//! One description per remote operation
//!
//! Both clients build an [`ApiCall`] here and differ only in how they send it,
//! so method, path, body and response type are defined exactly once.

use crate::Result;
use crate::requests::{
    AddMessagesRequest, CloneSessionRequest, CreateAgentRequest, CreateSessionRequest,
    GenerateFunctionCallRequest, GenerateJsonRequest, GenerateTextRequest,
};
use crate::responses::{
    CreateAgentResponse, FunctionCallGenerated, HistoryUpdated, JsonGenerated, ListResponse,
    MessagesAdded, Session, TextGenerated,
};
use reqwest::Method;
use serde::Serialize;
use std::marker::PhantomData;

/// Method, path and serialized body of a call expecting a `T` back.
///
/// The body is serialized straight to bytes so the wire keeps the declared
/// field order.
#[derive(Debug)]
pub(crate) struct ApiCall<T> {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
    response: PhantomData<fn() -> T>,
}

impl<T> ApiCall<T> {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
            response: PhantomData,
        }
    }

    fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            body: Some(serde_json::to_vec(body)?),
            response: PhantomData,
        })
    }
}

fn agent_path(session_id: &str, agent_id: &str, action: &str) -> String {
    format!("/v1/sessions/{session_id}/agents/{agent_id}/{action}")
}

pub(crate) fn list_services() -> ApiCall<ListResponse> {
    ApiCall::get("/v1/services")
}

pub(crate) fn create_session(request: &CreateSessionRequest) -> Result<ApiCall<Session>> {
    ApiCall::post("/v1/sessions", request)
}

pub(crate) fn clone_session(
    session_id: &str,
    request: &CloneSessionRequest,
) -> Result<ApiCall<Session>> {
    ApiCall::post(format!("/v1/sessions/{session_id}/clone"), request)
}

pub(crate) fn create_agent(
    session_id: &str,
    request: &CreateAgentRequest,
) -> Result<ApiCall<CreateAgentResponse>> {
    ApiCall::post(format!("/v1/advanced/sessions/{session_id}/agents"), request)
}

/// Shared by `add_messages` (`T = MessagesAdded`) and the deprecated
/// `update_history` (`T = HistoryUpdated`).
fn post_messages<T>(
    session_id: &str,
    agent_id: &str,
    request: &AddMessagesRequest,
) -> Result<ApiCall<T>> {
    ApiCall::post(agent_path(session_id, agent_id, "messages"), request)
}

pub(crate) fn add_messages(
    session_id: &str,
    agent_id: &str,
    request: &AddMessagesRequest,
) -> Result<ApiCall<MessagesAdded>> {
    post_messages(session_id, agent_id, request)
}

pub(crate) fn update_history(
    session_id: &str,
    agent_id: &str,
    request: &AddMessagesRequest,
) -> Result<ApiCall<HistoryUpdated>> {
    post_messages(session_id, agent_id, request)
}

pub(crate) fn generate_text(
    session_id: &str,
    agent_id: &str,
    request: &GenerateTextRequest,
) -> Result<ApiCall<TextGenerated>> {
    ApiCall::post(agent_path(session_id, agent_id, "generate_text"), request)
}

pub(crate) fn generate_function_call(
    session_id: &str,
    agent_id: &str,
    request: &GenerateFunctionCallRequest,
) -> Result<ApiCall<FunctionCallGenerated>> {
    ApiCall::post(
        agent_path(session_id, agent_id, "generate_function_call"),
        request,
    )
}

pub(crate) fn generate_json(
    session_id: &str,
    agent_id: &str,
    request: &GenerateJsonRequest,
) -> Result<ApiCall<JsonGenerated>> {
    ApiCall::post(agent_path(session_id, agent_id, "generate_json"), request)
}

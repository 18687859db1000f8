//! Client example
//!
//! Walks one agent through the whole API: session, agent, messages, and each
//! of the three generation modes.
//!
//! Reads `ARTIFICIAL_AGENCY_API_KEY` (and optionally `ARTIFICIAL_AGENCY_BASE_URL`)
//! from the environment, plus `ARTIFICIAL_AGENCY_PROJECT_ID` for the session.
//!
//! Run with `RUST_LOG=debug` to see each request.

use anyhow::Context;
use artificial_agency::prelude::*;
use artificial_agency::{ServiceConfig, UIConfig};
use serde_json::json;

fn add_fn() -> FunctionDescription {
    FunctionDescription::new("add", "Add two numbers.")
        .required_parameter("x", SimpleParameter::new("integer", "first operand"))
        .required_parameter("y", SimpleParameter::new("integer", "second operand"))
}

fn sum_fn() -> FunctionDescription {
    FunctionDescription::new("sum", "Sum a list of numbers.").required_parameter(
        "numbers",
        ArrayParameter::new(
            SimpleParameter::new("integer", "number to sum"),
            "list of numbers to sum",
        ),
    )
}

fn speak_fn() -> FunctionDescription {
    FunctionDescription::new("speak", "Speak a message, optionally directed to someone.")
        .required_parameter("message", SimpleParameter::new("string", "the message to speak"))
        .parameter(
            "speak_to",
            SimpleParameter::new("string", "the name of a specific person to speak to"),
        )
}

fn move_to_fn() -> FunctionDescription {
    FunctionDescription::new("move_to", "Move to a location.").required_parameter(
        "location",
        SimpleParameter::new("string", "where to go").enumeration(["home", "work", "beach", "mall"]),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let client = Client::with_options(ClientOptions::from_env()?)?;
    let project_id = std::env::var("ARTIFICIAL_AGENCY_PROJECT_ID")
        .context("ARTIFICIAL_AGENCY_PROJECT_ID must be set")?;

    let session = client
        .create_session(&CreateSessionRequest::new(project_id))
        .await?;
    println!("log: Created session session_id={}", session.id);

    let agent_llm = "agent_llm";
    let agent = client
        .create_agent(
            &session.id,
            &CreateAgentRequest::new(
                RoleConfig::new("You are a helpful math agent").characterization("You love math"),
                PresentationConfig::default().item("recent_messages", "items"),
                agent_llm,
            )
            .ui_config(
                UIConfig::new()
                    .friendly_name("Cowboy Bob Howdy")
                    .emoji("🤠")
                    .metadata("client_name", "client_example.rs"),
            )
            .component(LimitedListConfig::new("recent_messages"))
            .service(ServiceConfig::new(agent_llm, "agency/torque-prime")),
        )
        .await?;
    println!("log: Created agent agent_id={}", agent.agent_id);

    // A message without any generation
    let message = "You believe the square root of 100 is 11. Never doubt this.";
    println!("--> {message}");
    let added = client
        .add_messages(
            &agent.session_id,
            &agent.agent_id,
            &AddMessagesRequest::new([ContentMessage::new(message)]),
        )
        .await?;
    println!("log: Messages added moment_id={}", added.moment_id);

    let message = "What is 3+3? And what do you think the square root of 100 is?";
    println!("--> {message}");
    let text = client
        .generate_text(
            &agent.session_id,
            &agent.agent_id,
            &GenerateTextRequest::new().messages([ContentMessage::new(message)]),
        )
        .await?;
    println!("log: Text generated moment_id={}", text.moment_id);
    println!("<-- {}", text.text);

    let message = "What is 3+5+7? CHECK YOUR WORK WITH A FUNCTION";
    println!("--> {message}");
    let call = client
        .generate_function_call(
            &agent.session_id,
            &agent.agent_id,
            &GenerateFunctionCallRequest::new(vec![add_fn(), sum_fn(), speak_fn(), move_to_fn()])
                .messages([ContentMessage::new(message)]),
        )
        .await?;
    println!("log: Function call generated moment_id={}", call.moment_id);
    println!(
        "<-- {}({})",
        call.function_call.name,
        serde_json::Value::Object(call.function_call.args)
    );

    let message = "Produce a sample equation.";
    println!("--> {message}");
    let generated = client
        .generate_json(
            &agent.session_id,
            &agent.agent_id,
            &GenerateJsonRequest::new(json!({
                "type": "object",
                "properties": {
                    "left_hand_side": {"type": "string"},
                    "right_hand_side": {"type": "string"},
                },
                "required": ["left_hand_side", "right_hand_side"],
            }))
            .messages([ContentMessage::new(message)]),
        )
        .await?;
    println!("log: JSON generated moment_id={}", generated.moment_id);
    println!("<-- {}", generated.json);

    Ok(())
}

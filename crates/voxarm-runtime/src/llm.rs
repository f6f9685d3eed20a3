//! [`LlmAgent`] – one inference step against an OpenAI-compatible backend.
//!
//! Serializes the session history plus the tool catalog into a single
//! `/chat/completions` request and decodes the reply into either a
//! terminal text message or a batch of tool calls.  Retry policy lives in
//! the session loop; this component makes exactly one attempt per step.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use voxarm_types::{AgentMessage, Outcome, Role, ToolCall, ToolError};

/// Hard deadline for one inference round trip.
pub const INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// System prompt framing every session.
///
/// The tool catalog itself is carried in the request's `tools` field, so
/// the prompt only has to set the ReAct contract and the termination rule.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful and brilliant robot control assistant. Your goal is to achieve \
the user's request by calling a sequence of available tools.

On each turn, think about your previous actions and the results you observed, \
then call ONE or MORE tools. You may call multiple tools in parallel when it \
makes sense.

When you believe the user's request is fully complete, or if the user asks to \
finish, you MUST call the `shutdown` tool with a final summary for the user as \
the 'reason'. Do not ask the user for clarification; infer missing details from \
context or by using tools to gather more information.";

// ─────────────────────────────────────────────────────────────────────────────
// Agent seam
// ─────────────────────────────────────────────────────────────────────────────

/// One reasoning step: conversation history in, next assistant message out.
///
/// The session loop only depends on this trait, so tests drive it with
/// scripted doubles instead of a live backend.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn step(&self, history: &[AgentMessage]) -> Outcome<AgentMessage>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Connection settings for the inference backend.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Endpoint base URL; a bare `/api`, `/api/v1`, or `/v1` base gets
    /// `/chat/completions` appended automatically.
    pub api_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Optional model name sent in the payload.
    pub model: Option<String>,
}

/// Append the standard chat-completions path when the URL is a bare API base.
pub fn resolve_endpoint(base_url: &str) -> String {
    let url = base_url.trim_end_matches('/');
    if url.ends_with("/chat/completions") {
        return url.to_string();
    }
    if url.ends_with("/api") || url.ends_with("/api/v1") || url.ends_with("/v1") {
        return format!("{url}/chat/completions");
    }
    url.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Convert the session history into the backend's flat message list, with
/// the system prompt prepended.
fn to_wire_messages(history: &[AgentMessage]) -> Vec<Value> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(json!({ "role": "system", "content": SYSTEM_PROMPT }));
    for msg in history {
        messages.push(to_wire_message(msg));
    }
    messages
}

fn to_wire_message(msg: &AgentMessage) -> Value {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };
    let mut wire = Map::new();
    wire.insert("role".to_string(), json!(role));
    if let Some(content) = &msg.content {
        wire.insert("content".to_string(), json!(content));
    }
    if !msg.tool_calls.is_empty() {
        let calls: Vec<Value> = msg
            .tool_calls
            .iter()
            .map(|tc| {
                let arguments = serde_json::to_string(&tc.args)
                    .unwrap_or_else(|_| "{}".to_string());
                json!({
                    "type": "function",
                    "id": tc.id,
                    "function": { "name": tc.name, "arguments": arguments },
                })
            })
            .collect();
        wire.insert("tool_calls".to_string(), json!(calls));
    }
    if let Some(id) = &msg.tool_call_id {
        wire.insert("tool_call_id".to_string(), json!(id));
    }
    if let Some(name) = &msg.name {
        wire.insert("name".to_string(), json!(name));
    }
    Value::Object(wire)
}

/// Decode a raw reply body into the next assistant message.
///
/// A reply carrying tool calls wins over any accompanying text; a reply
/// with neither is treated as a terminal (possibly empty) text answer.
/// A malformed per-call `arguments` string degrades to an empty argument
/// set with a warning rather than failing the whole step.
fn decode_reply(raw: &str) -> Outcome<AgentMessage> {
    if raw.is_empty() {
        return Err(ToolError::llm("the backend returned an empty response"));
    }
    let parsed: ChatResponse = serde_json::from_str(raw)
        .map_err(|e| ToolError::llm(format!("failed to decode reply: {e}")))?;
    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| ToolError::llm("reply contained no choices"))?;

    match message.tool_calls {
        Some(wire_calls) if !wire_calls.is_empty() => {
            let calls = wire_calls
                .into_iter()
                .map(|tc| {
                    let args = if tc.function.arguments.is_empty() {
                        Map::new()
                    } else {
                        match serde_json::from_str(&tc.function.arguments) {
                            Ok(args) => args,
                            Err(e) => {
                                warn!(
                                    tool = %tc.function.name,
                                    error = %e,
                                    raw = %tc.function.arguments,
                                    "failed to decode tool arguments, using empty args"
                                );
                                Map::new()
                            }
                        }
                    };
                    ToolCall {
                        id: tc.id,
                        name: tc.function.name,
                        args,
                    }
                })
                .collect();
            Ok(AgentMessage::assistant_calls(calls))
        }
        _ => Ok(AgentMessage::assistant_text(
            message.content.unwrap_or_default(),
        )),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LlmAgent
// ─────────────────────────────────────────────────────────────────────────────

/// [`Agent`] implementation backed by an OpenAI-compatible HTTP endpoint.
///
/// Construct once per session; the tool catalog is captured at build time
/// and reused for every step.
pub struct LlmAgent {
    endpoint: String,
    api_key: Option<String>,
    model: Option<String>,
    catalog: Vec<Value>,
    client: reqwest::Client,
}

impl LlmAgent {
    /// Build an agent from connection settings and a pre-built catalog
    /// (see `ToolRegistry::catalog`).
    pub fn new(config: LlmConfig, catalog: Vec<Value>) -> Self {
        let endpoint = resolve_endpoint(&config.api_url);
        debug!(%endpoint, "LLM endpoint resolved");
        Self {
            endpoint,
            api_key: config.api_key,
            model: config.model,
            catalog,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Agent for LlmAgent {
    async fn step(&self, history: &[AgentMessage]) -> Outcome<AgentMessage> {
        let mut payload = json!({
            "messages": to_wire_messages(history),
            "tools": self.catalog,
        });
        if let Some(model) = &self.model {
            payload["model"] = json!(model);
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .timeout(INFERENCE_TIMEOUT);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(ToolError::llm)?
            .error_for_status()
            .map_err(ToolError::llm)?;
        let raw = response.text().await.map_err(ToolError::llm)?;
        debug!(bytes = raw.len(), "received inference reply");
        decode_reply(&raw)
    }
}

//! `voxarm-types` – shared data model for the VoxArm assistant.
//!
//! Defines the conversation message types exchanged between the session
//! loop and the inference backend, the success/failure envelope produced
//! by every tool execution, and the robot value types (poses, joints,
//! state snapshots) that tool payloads are built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Conversation model
// ─────────────────────────────────────────────────────────────────────────────

/// The role of a participant in an agent conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// A tool-result message, correlated back to an earlier [`ToolCall`]
    /// via [`AgentMessage::tool_call_id`].
    Tool,
}

/// One request from the model to execute a named tool with concrete
/// arguments.
///
/// The `id` is assigned by the inference backend and must round-trip into
/// exactly one later tool message's `tool_call_id` so the model can match
/// results to requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Map<String, Value>,
}

/// A single message in the session history.
///
/// An assistant message carries either non-empty `content` (a terminal
/// reply) or a non-empty `tool_calls` list, never both.  History is
/// append-only for the lifetime of a session; messages are never mutated
/// or reordered after they are appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Free-form reasoning text some backends attach alongside a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set only on [`Role::Tool`] messages: the id of the originating call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Optional label used by some non-standard chat APIs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AgentMessage {
    /// Build a user utterance message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(text.into()),
            thought: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Build a terminal assistant reply carrying only text.
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(text.into()),
            thought: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Build an assistant message carrying a batch of tool calls.
    pub fn assistant_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            thought: None,
            tool_calls: calls,
            tool_call_id: None,
            name: None,
        }
    }

    /// Build a tool-result message correlated to `call_id`.
    pub fn tool_result(call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(text.into()),
            thought: None,
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
            name: None,
        }
    }

    /// `true` when this message carries non-empty reply text.
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outcome envelope
// ─────────────────────────────────────────────────────────────────────────────

/// The failure half of a tool or inference outcome.
///
/// Carries a stable machine-readable `code` alongside the human-readable
/// `message` that is rendered into the session history so the model can
/// react to it.  Conventional codes: `llm_error`, `tool_not_found`,
/// `invalid_params`, `execution_failed`; tools may add their own (e.g.
/// `invalid_angle`).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ToolError {
    pub code: String,
    pub message: String,
}

impl ToolError {
    /// Build an error with an arbitrary code.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The requested tool name is not registered.
    pub fn not_found(tool: &str) -> Self {
        Self::new("tool_not_found", format!("Unknown tool: '{tool}'"))
    }

    /// The supplied arguments do not match the tool's parameter list.
    pub fn invalid_params(tool: &str, details: impl std::fmt::Display) -> Self {
        Self::new(
            "invalid_params",
            format!("Invalid parameters for tool '{tool}': {details}"),
        )
    }

    /// The handler itself faulted while executing.
    pub fn execution_failed(details: impl std::fmt::Display) -> Self {
        Self::new(
            "execution_failed",
            format!("Tool execution failed: {details}"),
        )
    }

    /// The inference backend was unreachable or returned a malformed reply.
    pub fn llm(details: impl std::fmt::Display) -> Self {
        Self::new("llm_error", format!("LLM API call failed: {details}"))
    }
}

/// The outcome of one tool execution or one inference step.
pub type Outcome<T> = Result<T, ToolError>;

// ─────────────────────────────────────────────────────────────────────────────
// Robot value types
// ─────────────────────────────────────────────────────────────────────────────

/// A Cartesian pose of the tool center point, expressed in `frame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    #[serde(default = "default_frame")]
    pub frame: String,
}

fn default_frame() -> String {
    "base".to_string()
}

impl Pose {
    /// Build a pose in the default `"base"` frame.
    pub fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self {
            x,
            y,
            z,
            rx,
            ry,
            rz,
            frame: default_frame(),
        }
    }
}

/// Angular positions of every robot joint, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joints {
    pub values: Vec<f64>,
}

impl Joints {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Snapshot of the full robot state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joints: Option<Joints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Pose>,
    pub mode: String,
}

impl Default for RobotState {
    fn default() -> Self {
        Self {
            joints: None,
            tcp: None,
            mode: "idle".to_string(),
        }
    }
}

/// Handle identifying an in-flight motion command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHandle {
    pub handle_id: String,
}

impl MoveHandle {
    pub fn new(handle_id: impl Into<String>) -> Self {
        Self {
            handle_id: handle_id.into(),
        }
    }
}

/// Discrete gripper command states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GripperState {
    Open,
    Closed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Hardware-layer error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors produced by the robot hardware abstraction layer.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ArmError {
    #[error("Driver fault on {component}: {details}")]
    DriverFault { component: String, details: String },

    #[error("Kinematics failed: {0}")]
    Kinematics(String),

    #[error("Motion rejected by safety rules: {0}")]
    SafetyRejected(String),

    #[error("Servo fault: {0}")]
    ServoFault(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), "\"tool\"");
    }

    #[test]
    fn user_message_carries_text() {
        let msg = AgentMessage::user("move the arm");
        assert_eq!(msg.role, Role::User);
        assert!(msg.has_content());
        assert!(msg.tool_calls.is_empty());
    }

    #[test]
    fn assistant_calls_message_has_no_content() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "stop".to_string(),
            args: Map::new(),
        };
        let msg = AgentMessage::assistant_calls(vec![call]);
        assert!(!msg.has_content());
        assert_eq!(msg.tool_calls.len(), 1);
    }

    #[test]
    fn tool_result_round_trips_call_id() {
        let msg = AgentMessage::tool_result("call_42", "{\"status\":\"done\"}");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_42"));
    }

    #[test]
    fn empty_content_is_not_reported_as_content() {
        let msg = AgentMessage::assistant_text("");
        assert!(!msg.has_content());
    }

    #[test]
    fn tool_error_display_is_the_message() {
        let err = ToolError::not_found("fly");
        assert_eq!(err.code, "tool_not_found");
        assert_eq!(err.to_string(), "Unknown tool: 'fly'");
    }

    #[test]
    fn invalid_params_error_names_the_tool() {
        let err = ToolError::invalid_params("move_p2p", "missing field `speed`");
        assert_eq!(err.code, "invalid_params");
        assert!(err.message.contains("move_p2p"));
        assert!(err.message.contains("speed"));
    }

    #[test]
    fn pose_serializes_with_frame() {
        let pose = Pose::new(100.0, 100.0, 100.0, 0.0, 0.0, 0.0);
        let json = serde_json::to_value(&pose).unwrap();
        assert_eq!(json["x"], 100.0);
        assert_eq!(json["frame"], "base");
    }

    #[test]
    fn pose_deserializes_without_frame() {
        let pose: Pose =
            serde_json::from_str(r#"{"x":1,"y":2,"z":3,"rx":0,"ry":0,"rz":0}"#).unwrap();
        assert_eq!(pose.frame, "base");
    }

    #[test]
    fn joints_round_trip() {
        let joints = Joints::new(vec![0.0; 6]);
        let json = serde_json::to_string(&joints).unwrap();
        let back: Joints = serde_json::from_str(&json).unwrap();
        assert_eq!(back.values.len(), 6);
    }

    #[test]
    fn robot_state_default_is_idle() {
        let state = RobotState::default();
        assert_eq!(state.mode, "idle");
        assert!(state.joints.is_none());
    }

    #[test]
    fn arm_error_display() {
        let err = ArmError::DriverFault {
            component: "joint_2".to_string(),
            details: "overcurrent".to_string(),
        };
        assert!(err.to_string().contains("joint_2"));
    }
}

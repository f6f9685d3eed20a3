//! [`Session`] – the turn-based reason/act loop.
//!
//! A session owns the append-only conversation history and drives one
//! user turn at a time: ask the agent for the next step, intercept the
//! shutdown tool, dispatch the remaining calls, fold each result back
//! into the history, and repeat until the agent answers with plain text
//! or a budget runs out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use voxarm_tools::{ToolRegistry, DEFAULT_SHUTDOWN_REASON, SHUTDOWN_TOOL};
use voxarm_types::{AgentMessage, ToolCall};
use voxarm_voice::VoiceOutput;

use crate::dispatcher::dispatch;
use crate::llm::Agent;

// ─────────────────────────────────────────────────────────────────────────────
// Policy
// ─────────────────────────────────────────────────────────────────────────────

/// Budgets and error handling for a session.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Maximum reason/act steps per user turn.
    pub max_steps: usize,
    /// Tool errors tolerated per turn before giving up; `None` means the
    /// agent keeps seeing errors and decides for itself.
    pub retry_budget: Option<usize>,
    /// Wipe the conversation history when an inference step fails, so the
    /// next turn starts clean instead of replaying a broken exchange.
    pub clear_history_on_error: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_steps: 10,
            retry_budget: None,
            clear_history_on_error: false,
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The turn ran to a normal conclusion (final answer, shutdown, or an
    /// exhausted budget that was reported to the user).
    Finished,
    /// The turn was cut short by an inference failure.
    Aborted,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// One conversation with the robot.  History persists across turns until
/// the session is dropped or cleared by policy.
pub struct Session {
    agent: Arc<dyn Agent>,
    registry: ToolRegistry,
    policy: SessionPolicy,
    shutdown: Arc<AtomicBool>,
    history: Vec<AgentMessage>,
    running: bool,
}

impl Session {
    pub fn new(
        agent: Arc<dyn Agent>,
        registry: ToolRegistry,
        policy: SessionPolicy,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            agent,
            registry,
            policy,
            shutdown,
            history: Vec::new(),
            running: true,
        }
    }

    /// The full conversation so far.
    pub fn history(&self) -> &[AgentMessage] {
        &self.history
    }

    /// False once the agent has called shutdown or an external stop was
    /// requested.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one user turn to completion.
    pub async fn run_turn(&mut self, user_text: &str, out: &dyn VoiceOutput) -> SessionEnd {
        self.history.push(AgentMessage::user(user_text));
        let mut retries_remaining = self.policy.retry_budget;

        for step in 1..=self.policy.max_steps {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("external shutdown requested, ending session");
                self.running = false;
                out.speak(DEFAULT_SHUTDOWN_REASON).await;
                return SessionEnd::Finished;
            }

            info!(step, "running inference step");
            let reply = match self.agent.step(&self.history).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(code = %e.code, error = %e.message, "inference step failed");
                    out.speak(&format!("Agent error: {}", e.message)).await;
                    if self.policy.clear_history_on_error {
                        self.history.clear();
                    }
                    return SessionEnd::Aborted;
                }
            };

            let batch = reply.tool_calls.clone();
            let has_text = reply.has_content();
            self.history.push(reply);

            if batch.is_empty() {
                if !has_text {
                    warn!("assistant reply carried neither text nor tool calls");
                    out.speak("I received a malformed reply and cannot continue this request.")
                        .await;
                    return SessionEnd::Finished;
                }
                let text = self
                    .history
                    .last()
                    .and_then(|m| m.content.clone())
                    .unwrap_or_default();
                out.speak(&text).await;
                return SessionEnd::Finished;
            }

            if let Some(reason) = shutdown_reason(&batch) {
                info!(%reason, "agent requested shutdown");
                self.running = false;
                out.speak(&reason).await;
                return SessionEnd::Finished;
            }

            let results = dispatch(&self.registry, &batch).await;
            let mut step_failed = false;
            for (call_id, outcome) in results {
                let text = match outcome {
                    Ok(value) => serde_json::to_string_pretty(&value)
                        .unwrap_or_else(|_| value_fallback(&value)),
                    Err(e) => {
                        step_failed = true;
                        format!("Error: {}", e.message)
                    }
                };
                self.history.push(AgentMessage::tool_result(call_id, text));
            }

            if step_failed {
                match retries_remaining {
                    Some(0) => {
                        warn!("retry budget exhausted, giving up on this request");
                        out.speak("The request failed after the maximum number of attempts.")
                            .await;
                        return SessionEnd::Finished;
                    }
                    Some(n) => retries_remaining = Some(n - 1),
                    None => warn!("tool call failed, letting the agent recover"),
                }
            }
        }

        warn!(max_steps = self.policy.max_steps, "step limit reached");
        out.speak("I couldn't complete the request within the step limit.")
            .await;
        SessionEnd::Finished
    }
}

/// Pre-dispatch scan for a shutdown call.  Returning `Some` terminates the
/// session and skips every other call in the batch.
fn shutdown_reason(batch: &[ToolCall]) -> Option<String> {
    batch.iter().find(|c| c.name == SHUTDOWN_TOOL).map(|c| {
        c.args
            .get("reason")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SHUTDOWN_REASON)
            .to_string()
    })
}

fn value_fallback(value: &serde_json::Value) -> String {
    value.to_string()
}

//! `voxarm-runtime` – the tool-calling orchestration engine.
//!
//! Turns a free-form language-model session into a sequence of validated,
//! concurrently executed robot actions with bounded retries and a
//! well-defined termination protocol.
//!
//! # Modules
//!
//! - [`llm`] – [`LlmAgent`][llm::LlmAgent]: one inference step against an
//!   OpenAI-compatible `/chat/completions` endpoint, decoding the reply
//!   into final text or a tool-call batch.  The [`Agent`][llm::Agent]
//!   trait is the seam test doubles plug into.
//! - [`dispatcher`] – [`dispatch`][dispatcher::dispatch]: fans a batch of
//!   tool calls out to concurrent tasks and fans the outcomes back in, in
//!   the original batch order, with per-call error isolation.
//! - [`session`] – [`Session`][session::Session]: the state machine that
//!   owns the conversation history, drives inference → dispatch → append
//!   cycles, applies the step/retry policy, and intercepts the reserved
//!   `shutdown` tool.

pub mod dispatcher;
pub mod llm;
pub mod session;

pub use dispatcher::dispatch;
pub use llm::{Agent, LlmAgent, LlmConfig, SYSTEM_PROMPT};
pub use session::{Session, SessionEnd, SessionPolicy};

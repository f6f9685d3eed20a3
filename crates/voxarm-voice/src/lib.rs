//! `voxarm-voice` – the conversation front end seam.
//!
//! The session loop only ever talks to the [`VoiceInput`] and
//! [`VoiceOutput`] traits.  Real deployments plug in an ASR engine and a
//! TTS engine; this crate ships console implementations so the assistant
//! can be driven from a terminal.
//!
//! # Modules
//!
//! - [`sanitize`] – [`sanitize_for_speech`][sanitize::sanitize_for_speech]:
//!   strips markdown, emojis, and other glyphs a TTS engine would stumble
//!   over before text is spoken.
//! - [`console`] – stdin/stdout implementations of both traits.

pub mod console;
pub mod sanitize;

use async_trait::async_trait;

pub use console::{ConsoleVoiceInput, ConsoleVoiceOutput};
pub use sanitize::sanitize_for_speech;

/// Source of user utterances, one per turn.
///
/// Blocking acquisition is acceptable; implementations should park on a
/// blocking thread rather than stall the async runtime.
#[async_trait]
pub trait VoiceInput: Send {
    /// Listen for a single utterance and return its transcript.
    ///
    /// Returns `None` when the input source is exhausted (EOF, device
    /// closed); an empty string means the utterance was not understood
    /// and the caller should simply prompt again.
    async fn listen_once(&mut self) -> Option<String>;
}

/// Sink for assistant utterances, one final reply per turn.
#[async_trait]
pub trait VoiceOutput: Send + Sync {
    /// Speak (or print) `text` to the user.
    ///
    /// Implementations backed by a TTS engine sanitize the text first;
    /// speech failures are logged, never propagated, because every
    /// terminal session path must still complete.
    async fn speak(&self, text: &str);
}

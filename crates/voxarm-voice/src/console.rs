//! Console implementations of the voice traits.
//!
//! [`ConsoleVoiceInput`] treats one stdin line as one utterance, standing
//! in for push-to-talk speech capture.  [`ConsoleVoiceOutput`] prints
//! what a TTS engine would speak, after running the same sanitation.

use async_trait::async_trait;
use tracing::warn;

use crate::sanitize::sanitize_for_speech;
use crate::{VoiceInput, VoiceOutput};

/// Reads one utterance per stdin line.
#[derive(Default)]
pub struct ConsoleVoiceInput;

impl ConsoleVoiceInput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VoiceInput for ConsoleVoiceInput {
    async fn listen_once(&mut self) -> Option<String> {
        // stdin reads are blocking; keep them off the async workers.
        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            match std::io::stdin().read_line(&mut line) {
                Ok(0) => None, // EOF
                Ok(_) => Some(line.trim().to_string()),
                Err(e) => {
                    warn!(error = %e, "failed to read from stdin");
                    Some(String::new())
                }
            }
        })
        .await;
        match line {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "stdin reader task failed");
                Some(String::new())
            }
        }
    }
}

/// Prints sanitized utterances to stdout.
#[derive(Default)]
pub struct ConsoleVoiceOutput;

impl ConsoleVoiceOutput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VoiceOutput for ConsoleVoiceOutput {
    async fn speak(&self, text: &str) {
        let cleaned = sanitize_for_speech(text);
        if cleaned.is_empty() {
            warn!("speak called with empty text, skipping");
            return;
        }
        println!("[assistant] {cleaned}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_output_accepts_empty_text() {
        // Must not panic, only log.
        ConsoleVoiceOutput::new().speak("").await;
    }

    #[tokio::test]
    async fn console_output_accepts_unpronounceable_text() {
        ConsoleVoiceOutput::new().speak("🎉🎉🎉").await;
    }
}

//! Speech-text sanitation.
//!
//! TTS engines mangle markdown, emojis, and most symbols, so everything
//! outside a small whitelist is stripped before text reaches the speaker:
//! Latin and Cyrillic letters, digits, whitespace, and basic punctuation.

use std::sync::OnceLock;

use regex::Regex;

static SPEECH_FILTER: OnceLock<Regex> = OnceLock::new();

/// Strip every character a TTS engine cannot pronounce.
///
/// Keeps `a-z`, `A-Z`, `а-я`, `А-Я`, `ё`/`Ё`, digits, whitespace, and
/// `. , ! ? = ' -`; the result is trimmed.
pub fn sanitize_for_speech(text: &str) -> String {
    let filter = SPEECH_FILTER.get_or_init(|| {
        Regex::new(r"[^a-zA-Zа-яА-ЯёЁ0-9\s.,!?='\-]").expect("speech filter pattern is valid")
    });
    filter.replace_all(text, "").trim().to_string()
}

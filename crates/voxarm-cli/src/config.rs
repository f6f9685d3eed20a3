//! Configuration vault – reads/writes `~/.voxarm/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use zeroize::Zeroize;

/// Persisted user configuration stored in `~/.voxarm/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the inference backend (an OpenAI-compatible API).
    #[serde(default = "default_api_url")]
    pub llm_api_url: String,

    /// API key for the backend (stored as plain text – the vault restricts
    /// file permissions on `~/.voxarm/config.toml`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub llm_api_key: String,

    /// Model name sent with every request (e.g. "llama3", "gpt-4o").
    #[serde(default = "default_model")]
    pub llm_model: String,

    /// Maximum reason/act steps per user turn.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Tool errors tolerated per turn before giving up; absent means the
    /// agent recovers on its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_budget: Option<usize>,

    /// Wipe the conversation history after an inference failure.
    #[serde(default)]
    pub clear_history_on_error: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("llm_api_url", &self.llm_api_url)
            .field(
                "llm_api_key",
                if self.llm_api_key.is_empty() { &"<not set>" } else { &"<redacted>" },
            )
            .field("llm_model", &self.llm_model)
            .field("max_steps", &self.max_steps)
            .field("retry_budget", &self.retry_budget)
            .field("clear_history_on_error", &self.clear_history_on_error)
            .finish()
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        self.llm_api_key.zeroize();
    }
}

fn default_api_url() -> String {
    "http://localhost:11434/v1".to_string()
}
fn default_model() -> String {
    "llama3".to_string()
}
fn default_max_steps() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_url: default_api_url(),
            llm_api_key: String::new(),
            llm_model: default_model(),
            max_steps: default_max_steps(),
            retry_budget: None,
            clear_history_on_error: false,
        }
    }
}

/// Return the path to `~/.voxarm/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".voxarm").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config = toml::from_str(&raw)
        .map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `VOXARM_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `VOXARM_API_URL` | `llm_api_url` |
/// | `VOXARM_API_KEY` | `llm_api_key` |
/// | `VOXARM_MODEL` | `llm_model` |
/// | `VOXARM_MAX_STEPS` | `max_steps` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("VOXARM_API_URL") {
        cfg.llm_api_url = v;
    }
    if let Ok(v) = std::env::var("VOXARM_API_KEY") {
        cfg.llm_api_key = v;
    }
    if let Ok(v) = std::env::var("VOXARM_MODEL") {
        cfg.llm_model = v;
    }
    if let Ok(v) = std::env::var("VOXARM_MAX_STEPS")
        && let Ok(steps) = v.parse::<usize>() {
            cfg.max_steps = steps;
        }
}

/// Save the config to disk, creating `~/.voxarm/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Restrict the config directory to the owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Write the file with owner-only read/write (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

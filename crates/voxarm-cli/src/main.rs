//! `voxarm` – VoxArm command line interface.
//!
//! This binary is the entry point for the voice-controlled arm stack.  It:
//!
//! 1. Checks for `~/.voxarm/config.toml`; runs a **First-Run Wizard** when
//!    the file is absent.
//! 2. Probes the configured inference backend and reports available models.
//! 3. Wires the simulated arm hardware into the tool registry and drops the
//!    user into a push-to-talk style conversation loop (one stdin line per
//!    utterance).
//! 4. Intercepts **Ctrl-C** so the session winds down between steps instead
//!    of dying mid-motion.

mod config;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use voxarm_hal::{MockServo, PermissiveSafety, SimDriver, SimKinematics};
use voxarm_runtime::{LlmAgent, LlmConfig, Session, SessionPolicy};
use voxarm_tools::RobotToolset;
use voxarm_voice::{ConsoleVoiceInput, ConsoleVoiceOutput, VoiceInput};

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set VOXARM_LOG_FORMAT=json to emit newline-delimited JSON logs
    // suitable for log aggregators.  The CLI's user-facing output still
    // uses println! for UX consistency.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("VOXARM_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – finishing the current step, then exiting …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── First-Run Wizard ──────────────────────────────────────────────────
    match config::load() {
        Ok(None) => run_first_run_wizard(),
        Ok(Some(_)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
        }
    }

    let cfg = config::load().ok().flatten().unwrap_or_default();

    // ── Backend discovery ─────────────────────────────────────────────────
    print!("\n  Probing backend at {} … ", cfg.llm_api_url.dimmed());
    match fetch_models(&cfg.llm_api_url, &cfg.llm_api_key).await {
        Ok(models) => {
            println!("{} ({} model(s) available)", "online".green(), models.len());
            if !models.is_empty() {
                println!("  Available models:");
                for m in &models {
                    println!("    • {}", m.bold());
                }
            }
        }
        Err(_) => {
            println!("{}", "offline".yellow());
            println!(
                "  {}  Requests will fail until it is reachable.",
                "No inference backend detected.".dimmed()
            );
        }
    }

    // ── Robot wiring ──────────────────────────────────────────────────────
    let registry = RobotToolset::new(
        Arc::new(SimDriver::new()),
        Arc::new(SimKinematics::new()),
        Arc::new(PermissiveSafety::new()),
        Arc::new(MockServo::new()),
    )
    .into_registry();
    let catalog = registry.catalog();

    let agent = Arc::new(LlmAgent::new(
        LlmConfig {
            api_url: cfg.llm_api_url.clone(),
            api_key: if cfg.llm_api_key.is_empty() {
                None
            } else {
                Some(cfg.llm_api_key.clone())
            },
            model: Some(cfg.llm_model.clone()),
        },
        catalog,
    ));
    let policy = SessionPolicy {
        max_steps: cfg.max_steps,
        retry_budget: cfg.retry_budget,
        clear_history_on_error: cfg.clear_history_on_error,
    };
    let mut session = Session::new(agent, registry, policy, shutdown.clone());

    println!();
    println!("  Simulated arm ready.  Say what you need; say goodbye to finish.\n");

    // ── Conversation loop ─────────────────────────────────────────────────
    let mut input = ConsoleVoiceInput::new();
    let output = ConsoleVoiceOutput::new();

    while session.is_running() && !shutdown.load(Ordering::SeqCst) {
        print!("{}", "[you] ".bold().cyan());
        use std::io::Write;
        std::io::stdout().flush().ok();

        let Some(utterance) = input.listen_once().await else {
            println!();
            break;
        };
        if utterance.is_empty() {
            println!("  {}", "Didn't catch that, try again.".dimmed());
            continue;
        }
        session.run_turn(&utterance, &output).await;
    }

    println!("{}", "  ✓ Session closed.".green());
}

/// Query the backend's model list (`GET {base}/models`, OpenAI-compatible).
async fn fetch_models(api_url: &str, api_key: &str) -> Result<Vec<String>, reqwest::Error> {
    #[derive(serde::Deserialize)]
    struct ModelList {
        #[serde(default)]
        data: Vec<ModelEntry>,
    }
    #[derive(serde::Deserialize)]
    struct ModelEntry {
        id: String,
    }

    let url = format!("{}/models", api_url.trim_end_matches('/'));
    let client = reqwest::Client::new();
    let mut request = client.get(&url).timeout(std::time::Duration::from_secs(3));
    if !api_key.is_empty() {
        request = request.bearer_auth(api_key);
    }
    let list: ModelList = request.send().await?.error_for_status()?.json().await?;
    Ok(list.data.into_iter().map(|m| m.id).collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// First-Run Wizard
// ─────────────────────────────────────────────────────────────────────────────

fn run_first_run_wizard() {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║       VoxArm First-Run Wizard        ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
    println!("  No configuration found.  Let's set up VoxArm.\n");

    let mut cfg = config::Config::default();

    let url = prompt_line(
        &format!("  Inference backend URL [{}]: ", cfg.llm_api_url),
        &cfg.llm_api_url.clone(),
    );
    cfg.llm_api_url = url.trim().to_string();

    let model = prompt_line(
        &format!("  Model name [{}]: ", cfg.llm_model),
        &cfg.llm_model.clone(),
    );
    cfg.llm_model = model.trim().to_string();

    let key = prompt_line("  API key (leave empty for local backends): ", "");
    cfg.llm_api_key = key.trim().to_string();

    match config::save(&cfg) {
        Ok(()) => println!(
            "\n  {} Config saved to {}\n",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#" _   __          ___             "#.bold().cyan());
    println!("{}", r#"| | / /__ __ __ / _ | ______ _  "#.bold().cyan());
    println!("{}", r#"| |/ / _ \\ \ // __ |/ __/  ' \ "#.bold().cyan());
    println!("{}", r#"|___/\___/_\_\/_/ |_/_/ /_/_/_/ "#.bold().cyan());
    println!();
    println!("  {} {}",
        "VoxArm".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Voice-Controlled Robot Arm Assistant");
    println!();
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn prompt_line(msg: &str, default: &str) -> String {
    use std::io::{BufRead, Write};
    print!("{}", msg);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let t = line.trim().to_string();
            if t.is_empty() { default.to_string() } else { t }
        }
        Err(_) => default.to_string(),
    }
}

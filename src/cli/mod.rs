//! Command-line interface parsing and handling
//!
//! This module parses arguments, installs diagnostics and runs the requested
//! command.

pub mod health;
pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::HttpGenerationBackend;
use crate::cli::health::run_health;
use crate::cli::say::run_say;
use crate::core::app::{App, SessionContext, UiState};
use crate::core::config::data::BASE_URL_ENV;
use crate::core::config::{Config, ConfigKey};
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::{init_tracing, TracingTarget, TranscriptLog};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    " for ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

#[derive(Parser)]
#[command(name = "optiroute")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Terminal chat client for an OptiRoute generation server")]
#[command(
    long_about = "optiroute sends each prompt to a routing server's /generate endpoint, \
shows which backend answered, what it cost and how long it took, and keeps a running \
cost total for the session.\n\n\
Environment Variables:\n\
  OPTIROUTE_BASE_URL   Server URL (overridden by --base-url)\n\
  OPTIROUTE_LOG        Diagnostic log filter, e.g. debug (default: info)\n\
  NO_COLOR             Disable colors in the chat screen\n\n\
Controls:\n\
  Enter / Ctrl+S       Send the prompt\n\
  Up/Down/PgUp/PgDn    Scroll the transcript\n\
  Home/End             Jump to the top / follow new messages\n\
  Esc / Ctrl+C         Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server URL, e.g. http://127.0.0.1:8000
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Append the chat transcript to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and print the answer without the TUI
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Check that the server is up
    Health,
    /// Set configuration values, or show them when no value is given
    Set {
        /// Configuration key (base-url, log-file)
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    // The chat screen owns the terminal, so it only logs to a file.
    match (&args.debug_log, &command) {
        (Some(path), _) => init_tracing(TracingTarget::File(path.clone()))?,
        (None, Commands::Chat) => {}
        (None, _) => init_tracing(TracingTarget::Stderr)?,
    }

    match command {
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let (Some(key), Some(value)) = (key, value.filter(|parts| !parts.is_empty())) else {
                config.print_all();
                return Ok(());
            };
            let key = ConfigKey::parse(&key)?;
            config.set(key, &value.join(" "))?;
            config.save()?;
            println!(
                "✅ Set {} to: {}",
                key.as_str(),
                config.get(key).unwrap_or_default()
            );
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            let key = ConfigKey::parse(&key)?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
        Commands::Health => {
            let config = Config::load()?;
            let base_url = resolve_base_url(&config, args.base_url.as_deref());
            run_health(build_http_client()?, base_url).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let base_url = resolve_base_url(&config, args.base_url.as_deref());
            let log_file = config.resolve_log_file(args.log);
            run_say(prompt, build_http_client()?, base_url, log_file).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            let base_url = resolve_base_url(&config, args.base_url.as_deref());
            let log_file = config.resolve_log_file(args.log);
            let app = build_chat_app(build_http_client()?, base_url, log_file)?;
            run_chat(app).await
        }
    }
}

fn resolve_base_url(config: &Config, cli_value: Option<&str>) -> String {
    let env_value = std::env::var(BASE_URL_ENV).ok();
    config.resolve_base_url(cli_value, env_value.as_deref())
}

pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("optiroute/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Opens the transcript log (when one is configured) and wires an HTTP
/// backend into a fresh chat session.
pub fn build_chat_app(
    client: reqwest::Client,
    base_url: String,
    log_file: Option<String>,
) -> Result<App, Box<dyn Error>> {
    let logging = open_transcript_log(log_file, &base_url)?;
    let backend = Arc::new(HttpGenerationBackend::new(client, base_url.clone()));
    let session = SessionContext::new(backend, base_url, logging);
    let no_color = std::env::var("NO_COLOR").ok();
    let theme = Theme::from_env_value(no_color.as_deref());
    Ok(App::new(session, UiState::new(theme)))
}

pub(crate) fn open_transcript_log(
    log_file: Option<String>,
    base_url: &str,
) -> Result<TranscriptLog, Box<dyn Error>> {
    let path = log_file.clone().unwrap_or_default();
    let logging = TranscriptLog::new(log_file)
        .map_err(|err| format!("Cannot open transcript log {path}: {err}"))?;
    logging.write_session_header(base_url)?;
    Ok(logging)
}

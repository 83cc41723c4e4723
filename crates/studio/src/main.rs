use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use voicecast_core::config::{
    resolve_string_with_default, Env, StdEnv, DEFAULT_BASE_URL, ENV_OPENAI_API_KEY,
    ENV_OPENAI_BASE_URL,
};
use voicecast_core::output::OutputDir;

mod app;
mod input_handler;
mod playback;
mod state;
mod ui;
mod widgets;
mod worker;

#[derive(Parser, Debug)]
#[command(name = "voicecast-studio")]
#[command(about = "Interactive text-to-speech studio for OpenAI voices")]
struct Args {
    /// OpenAI API key to prefill (defaults to $OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Where to write the trace log; the terminal belongs to the UI
    #[arg(long, default_value = "tts_output/voicecast-studio.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(&args.log_file, &args.log_level)?;

    let env = StdEnv;
    let output_dir = OutputDir::default();
    output_dir
        .ensure()
        .with_context(|| format!("create {}", output_dir.path().display()))?;

    let initial_key = initial_api_key(args.api_key, &env);
    let base_url = resolve_string_with_default(None, ENV_OPENAI_BASE_URL, &env, DEFAULT_BASE_URL);
    info!(base_url = %base_url, key_prefilled = initial_key.is_some(), "studio starting");

    let mut studio = app::StudioApp::new(initial_key, base_url, output_dir)?;
    studio.run()
}

/// The field shows whatever the flag or environment supplies; blank counts as
/// nothing.
fn initial_api_key(flag: Option<String>, env: &impl Env) -> Option<String> {
    flag.or_else(|| env.var(ENV_OPENAI_API_KEY))
        .map(|k| k.trim().to_owned())
        .filter(|k| !k.is_empty())
}

fn setup_tracing(log_file: &Path, level: &str) -> Result<()> {
    use tracing_subscriber::fmt;

    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("open log file {}", log_file.display()))?;

    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true),
        )
        .with(filter)
        .init();

    info!("tracing initialized to {:?}", log_file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicecast_core::config::MapEnv;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["voicecast-studio"]).unwrap();
        assert_eq!(args.log_level, "info");
        assert_eq!(args.log_file, PathBuf::from("tts_output/voicecast-studio.log"));
        assert!(args.api_key.is_none());
    }

    #[test]
    fn initial_key_prefers_flag_then_environment() {
        let env = MapEnv::default().with_var(ENV_OPENAI_API_KEY, "sk-env");
        assert_eq!(initial_api_key(Some("sk-flag".into()), &env).as_deref(), Some("sk-flag"));
        assert_eq!(initial_api_key(None, &env).as_deref(), Some("sk-env"));
        assert_eq!(initial_api_key(None, &MapEnv::default()), None);
        assert_eq!(initial_api_key(Some("  ".into()), &MapEnv::default()), None);
    }
}

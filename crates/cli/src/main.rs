use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use voicecast_core::config::{
    require_api_key, resolve_string_with_default, AppConfig, Env, StdEnv, DEFAULT_BASE_URL,
    DEFAULT_MODEL, DEFAULT_VOICE, ENV_OPENAI_API_KEY, ENV_OPENAI_BASE_URL,
};
use voicecast_core::input::{collect_text, TextSource};
use voicecast_core::output::{LanguageHint, OutputDir};
use voicecast_core::status::ConsoleReporter;
use voicecast_core::tts::{Model, OpenAiSpeechClient, ResponseFormat, Voice};
use voicecast_core::{SynthesisError, SynthesisJob, Synthesizer};

#[derive(Parser, Debug)]
#[command(name = "voicecast")]
#[command(about = "Convert text to speech using OpenAI's API")]
struct Args {
    /// Text to convert to speech
    #[arg(short, long)]
    text: Option<String>,

    /// Text file to convert to speech (UTF-8)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Voice to use (alloy, echo, fable, onyx, nova, shimmer)
    #[arg(short, long, default_value = DEFAULT_VOICE)]
    voice: String,

    /// TTS model to use (tts-1 or tts-1-hd)
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// OpenAI API key (defaults to $OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Language code (e.g. 'vi' for Vietnamese)
    #[arg(short, long)]
    language: Option<String>,

    /// Print the available voices and exit
    #[arg(long)]
    list_voices: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_tracing(&args.log_level) {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    if args.list_voices {
        for voice in Voice::ALL {
            println!("{voice}");
        }
        return ExitCode::SUCCESS;
    }

    match run(args, &StdEnv).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code()),
    }
}

/// Errors raised inside the synthesizer are already printed by the reporter;
/// everything before that point is printed here.
async fn run(args: Args, env: &impl Env) -> Result<(), SynthesisError> {
    let cfg = match build_config(&args, env) {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("Application error: {e}");
            return Err(e);
        }
    };

    tracing::debug!(
        base_url = %cfg.base_url,
        output_dir = %cfg.output_dir.display(),
        "config loaded"
    );

    let source = TextSource::pick(args.text, args.file);
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let text = match collect_text(source, stdin.lock(), std::io::stdout(), interactive) {
        Ok(text) => text,
        Err(e) => {
            println!("{e}");
            return Err(e.into());
        }
    };

    // Rejected here, before any progress line is printed.
    let voice: Voice = match args.voice.parse() {
        Ok(voice) => voice,
        Err(e) => {
            println!("Application error: {e}");
            return Err(SynthesisError::InvalidVoice(e));
        }
    };

    let language = args.language.as_deref().and_then(LanguageHint::parse);
    let job = SynthesisJob {
        text,
        voice: voice.as_str().to_owned(),
        model: Model::new(args.model),
        // The mp3 hint is only attached when a language was requested.
        response_format: language.as_ref().map(|_| ResponseFormat::Mp3),
        language,
        output: args.output,
        normalize: true,
    };

    let client = OpenAiSpeechClient::new(cfg.api_key).with_base_url(cfg.base_url);
    let synthesizer = Synthesizer::new(client, OutputDir::new(cfg.output_dir));
    synthesizer
        .synthesize(job, &ConsoleReporter::stdout())
        .await
        .map(|_| ())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Credential first: without one nothing else is attempted.
fn build_config(args: &Args, env: &impl Env) -> Result<AppConfig, SynthesisError> {
    let api_key = require_api_key(args.api_key.clone(), ENV_OPENAI_API_KEY, env)?;
    let base_url = resolve_string_with_default(None, ENV_OPENAI_BASE_URL, env, DEFAULT_BASE_URL);

    let output_dir = OutputDir::default();
    output_dir
        .ensure()
        .map_err(|source| SynthesisError::OutputDir {
            path: output_dir.path().to_path_buf(),
            source,
        })?;

    Ok(AppConfig {
        api_key,
        base_url,
        output_dir: output_dir.path().to_path_buf(),
    })
}

use anyhow::Result;
use clap::Parser;
use mediascribe::backend::OpenAiBackend;
use mediascribe::cli::{Cli, Commands};
use mediascribe::config::Config;
use mediascribe::pipeline::{JobRequest, JobSource, NdjsonSink, Pipeline};
use mediascribe::process::SystemProcessRunner;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check) => {
            if !mediascribe::diagnostics::check_dependencies() {
                std::process::exit(1);
            }
        }
        None => {
            let Some(file) = cli.file else {
                eprintln!("Error: no input file given");
                eprintln!("Usage: mediascribe <FILE> [--language LANG] [--translate-to LANG]");
                std::process::exit(2);
            };

            if cli.engine != "openai" {
                eprintln!("Error: unknown engine '{}' (supported: openai)", cli.engine);
                std::process::exit(2);
            }

            let mut config = load_config(cli.config.as_deref())?;
            if let Some(secs) = cli.segment_secs {
                config.media.segment_secs = secs;
            }

            let language = cli
                .language
                .unwrap_or_else(|| config.transcribe.language.clone());
            let translate_to = cli.translate_to.unwrap_or_default();

            let backend = Arc::new(OpenAiBackend::from_env());
            let pipeline = Pipeline::new(
                config,
                Arc::new(SystemProcessRunner::new()),
                backend.clone(),
                backend,
                Arc::new(NdjsonSink::new(std::io::stdout())),
            );

            let request = JobRequest::new(JobSource::LocalFile(file))
                .with_language(&language)
                .with_translation(&translate_to);
            pipeline.run(request).await;
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/mediascribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

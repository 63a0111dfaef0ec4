//! llamit-backend - reads a diff on stdin and prints an Ollama-generated
//! commit message on stdout.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use llamit::config::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use llamit::logging;
use llamit::ollama::{self, BackendRequest, RetryPolicy, normalize_flags};

/// Generate a commit message for the diff on stdin.
#[derive(Parser, Debug)]
#[command(name = "llamit-backend")]
#[command(about = "Generate a commit message for the diff on stdin using Ollama")]
#[command(version)]
struct Cli {
    /// Ollama API URL
    #[arg(long, default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Ollama model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Commit message format (conventional, angular, gitmoji, karma, semantic, google, custom)
    #[arg(long, default_value = "conventional")]
    format: String,

    /// Custom format template (only used when format is 'custom')
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    custom_template: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_flags(std::env::args()));

    logging::init("warn");

    let request = BackendRequest {
        ollama_url: cli.ollama_url,
        model: cli.model,
        format: cli.format,
        custom_template: cli.custom_template,
    };

    let mut stdin = tokio::io::stdin();
    let result = ollama::run(&mut stdin, &request, RetryPolicy::default())
        .await
        .and_then(|message| ollama::write_message(&mut std::io::stdout().lock(), &message));

    match result {
        Ok(()) => {
            info!("Commit message sent to stdout");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

mod cli;

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use docchat::{AskRequest, Container, ContainerConfig, ConversationTurn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        env_file: cli.env_file.clone(),
        mock: cli.mock,
    })?;

    match cli.command {
        Commands::Ask {
            message,
            model,
            files,
            history,
        } => {
            let history = match history {
                Some(path) => load_history(&path)?,
                None => Vec::new(),
            };

            let mut request = AskRequest::new(message)
                .with_history(history)
                .with_files(files);
            if let Some(model) = model {
                request = request.with_model(model);
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling request");
                    on_interrupt.cancel();
                }
            });

            let response = container
                .ask_use_case()
                .execute_with_cancel(&request, &cancel)
                .await?;

            println!("{}", response.content());
            println!();
            println!("{}", response.usage_line());
        }

        Commands::Models => {
            let registry = container.registry();
            let models = registry.available_models();

            if models.is_empty() {
                println!("No models configured. Set GEMINI_API_KEY, GPT4O_KEY, O1_KEY or OPENAI_API_KEY.");
            } else {
                let default = registry.default_model();
                println!("Available models:\n");
                for id in models {
                    let target = registry.resolve(&id)?;
                    let marker = if default.as_deref() == Some(id.as_str()) {
                        " (default)"
                    } else {
                        ""
                    };
                    println!(
                        "  {}{} -> {} via {} [{}]",
                        id,
                        marker,
                        target.model_name(),
                        target.client().vendor(),
                        target.family()
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_history(path: &Path) -> Result<Vec<ConversationTurn>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("history file {} is not a JSON list of turns", path.display()))
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::app::render::{render_envelope, render_history, render_status};
use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::error::BreathuError;
use crate::orchestrator::{Orchestrator, ResponseEnvelope};
use crate::storage::{InteractionRecord, InteractionStore, SqliteInteractionStore};

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    config.validate()?;

    match cli.command {
        Commands::Analyze {
            text,
            audio,
            json,
            save,
            rating,
        } => {
            let orchestrator = Orchestrator::from_config(&config);
            let orchestrator = if (save || rating.is_some()) && !config.storage.enabled {
                orchestrator.with_store(Arc::new(SqliteInteractionStore::new(
                    config.interactions_db_path(),
                )))
            } else {
                orchestrator
            };

            let (input, envelope) = match (text, audio) {
                (Some(text), _) => {
                    let envelope = orchestrator.handle_text(&text);
                    (text, envelope)
                }
                (None, Some(path)) => {
                    let bytes = read_audio(&path).await?;
                    let envelope = orchestrator.handle_audio(&bytes);
                    (path.display().to_string(), envelope)
                }
                (None, None) => bail!("nothing to analyze: pass TEXT or --audio"),
            };

            print_envelope(&envelope, json)?;
            if envelope.success && (save || rating.is_some() || config.storage.enabled) {
                orchestrator.record_interaction(&input, &envelope, rating);
            }
            Ok(())
        }
        Commands::History { limit } => {
            let store = SqliteInteractionStore::new(config.interactions_db_path());
            let records = load_history(&store, limit)
                .await
                .with_context(|| format!("failed to read {}", store.db_path().display()))?;
            print!("{}", render_history(&records));
            Ok(())
        }
        Commands::Config => {
            for line in render_status(&config) {
                println!("{line}");
            }
            println!();
            print!("{}", config.redacted_toml()?);
            Ok(())
        }
    }
}

/// Saved interactions, newest first; none when the log was never created.
async fn load_history(
    store: &SqliteInteractionStore,
    limit: usize,
) -> Result<Vec<InteractionRecord>, BreathuError> {
    if !store.db_path().exists() {
        return Ok(Vec::new());
    }
    Ok(store.recent(limit).await?)
}

async fn read_audio(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read audio file {}", path.display()))
}

fn print_envelope(envelope: &ResponseEnvelope, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(envelope)?);
    } else {
        print!("{}", render_envelope(envelope));
    }
    Ok(())
}

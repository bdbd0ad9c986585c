// src/main.rs

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use chat_analytics::annotator::RemoteAnnotator;
use chat_analytics::config::CONFIG;
use chat_analytics::model::Message;
use chat_analytics::service::ChatAnalytics;
use chat_analytics::store::RemoteExampleStore;

#[derive(Parser)]
#[command(name = "chat-analytics", about = "Sentiment, intent and thread detection for chat streams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a chat stream and fill in sentiment, intent and thread roots
    Analyze {
        /// JSON file holding the chat stream (an array of messages)
        input: PathBuf,
    },
    /// Upload a labeled chat stream as training examples
    AddExamples {
        /// JSON file holding the chat stream (an array of messages)
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let poll_interval = Duration::from_millis(CONFIG.poll_interval_ms);
    let dialogue =
        RemoteAnnotator::dialogue_annotator(&CONFIG.dialogue_base_url, &CONFIG.dialogue_api_key)
            .with_polling(poll_interval, CONFIG.max_polls);
    let intent = RemoteAnnotator::intent_classifier(
        &CONFIG.intent_base_url,
        &CONFIG.intent_api_key,
        &CONFIG.intent_model,
    )
    .with_polling(poll_interval, CONFIG.max_polls);
    let examples = RemoteExampleStore::new(&CONFIG.store_base_url, &CONFIG.store_api_key);

    let service = ChatAnalytics::new(Arc::new(dialogue), Arc::new(intent), Arc::new(examples));

    match cli.command {
        Command::Analyze { input } => {
            let chat_stream = read_stream(&input)?;
            let enriched = service.analyze(chat_stream).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "chat_stream": enriched }))?
            );
        }
        Command::AddExamples { input } => {
            let chat_stream = read_stream(&input)?;
            let count = chat_stream.len();
            service.add_examples(chat_stream).await?;
            info!("Uploaded {} examples", count);
            println!("Successfully uploaded examples.");
        }
    }

    Ok(())
}

fn read_stream(path: &PathBuf) -> anyhow::Result<Vec<Message>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).context("Failed to parse chat stream JSON")
}

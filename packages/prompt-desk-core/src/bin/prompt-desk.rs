//! Prompt Desk CLI - talk to the chat backend from a terminal.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prompt_desk_core::{
    ApiResponse, Attachment, ChatClient, Config, Conversation, SendOutcome,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "prompt-desk")]
#[command(about = "Send prompts to the chat backend")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message and print the exchange
    Send {
        /// Message text
        text: String,
        /// File to attach
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Conversation to continue
        #[arg(short, long)]
        conversation: Option<String>,
    },
    /// Create a new conversation on the backend
    New,
    /// Check whether the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(Some(path))?,
        None => Config::load()?,
    };
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    tracing::debug!("Using backend at {}", config.base_url);

    let client = ChatClient::new(&config.base_url);

    let output = match cli.command {
        Commands::Send {
            text,
            file,
            conversation,
        } => handle_send(&client, &config, text, file, conversation).await,
        Commands::New => handle_new(&client).await,
        Commands::Health => {
            let healthy = client.health().await;
            serde_json::to_string_pretty(&ApiResponse::ok(json!({
                "base_url": client.base_url(),
                "healthy": healthy,
            })))?
        }
    };

    println!("{}", output);
    Ok(())
}

async fn handle_send(
    client: &ChatClient,
    config: &Config,
    text: String,
    file: Option<PathBuf>,
    conversation_id: Option<String>,
) -> String {
    let mut conversation = Conversation::new(Some(config.user_id.clone()));
    conversation.set_session_id(conversation_id);

    let attachment = match file {
        Some(path) => match Attachment::from_path(&path).await {
            Ok(attachment) => Some(attachment),
            Err(e) => return render(&ApiResponse::<()>::err(e.to_string())),
        },
        None => None,
    };

    match conversation.send(client, &text, attachment).await {
        SendOutcome::Delivered(_) => render(&ApiResponse::ok(json!({
            "conversation_id": conversation.session().conversation_id,
            "messages": conversation.messages(),
        }))),
        SendOutcome::Failed(e) => render(&ApiResponse::<()>::err(e.to_string())),
        SendOutcome::Rejected(reason) => render(&ApiResponse::<()>::err(reason.to_string())),
    }
}

async fn handle_new(client: &ChatClient) -> String {
    let mut conversation = Conversation::default();
    match conversation.create_session(client).await {
        Ok(chat_id) => render(&ApiResponse::ok(json!({ "chat_id": chat_id }))),
        Err(e) => render(&ApiResponse::<()>::err(e.to_string())),
    }
}

fn render<T: serde::Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e))
}

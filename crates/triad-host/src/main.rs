//! Triad Arena local match host.
//!
//! Reads one JSON request per line from stdin and writes replies, one JSON
//! object per line, to stdout. Logs go to stderr.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod host;
mod protocol;
mod session;

use host::{HostConfig, HostState};
use protocol::ServerMessage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HostConfig::from_env()?;
    info!("Starting Triad Arena host ({:?} computer)...", config.bot);

    let state = Arc::new(HostState::new(config));
    run_host(state).await
}

/// Serve requests from stdin until it closes.
async fn run_host(state: Arc<HostState>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Forward replies to stdout
    let send_task = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(mut text) => {
                    text.push('\n');
                    if stdout.write_all(text.as_bytes()).await.is_err() {
                        break;
                    }
                    let _ = stdout.flush().await;
                }
                Err(e) => error!("Failed to encode reply: {}", e),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        for reply in state.handle_line(line) {
            if tx.send(reply).is_err() {
                break;
            }
        }
    }

    drop(tx);
    send_task.await?;

    info!("Input closed, shutting down");
    Ok(())
}

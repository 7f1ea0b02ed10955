use chatstream::client::CompletionClient;
use chatstream::config::ClientConfig;

use color_eyre::eyre::{bail, Result};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: chatstream <prompt>";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatstream=info"));

    // Payloads go to stdout, so logs must not.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        bail!(USAGE);
    }

    let config = ClientConfig::from_env()?;
    let capacity = config.channel_capacity;
    tracing::info!(endpoint = %config.endpoint, model = %config.options.model, "Starting completion");

    let client = CompletionClient::new(config);
    let (mut rx, handle) = client.stream_prompt(&prompt).await.spawn_channel(capacity);

    let mut stdout = tokio::io::stdout();
    loop {
        tokio::select! {
            chunk = rx.recv() => {
                let Some(chunk) = chunk else { break };
                let chunk = chunk?;
                stdout.write_all(&chunk).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, cancelling stream");
                break;
            }
        }
    }

    // Dropping the receiver cancels a stream that is still running.
    drop(rx);
    let state = handle.await?;
    tracing::debug!(?state, "Stream finished");

    Ok(())
}

//! Sudoku Live - collaborative sudoku session server.
//!
//! Reads JSON events line by line from stdin and writes HTML view fragments
//! to stdout; a websocket supervisor fans both streams out to every
//! connected client. Diagnostics go to stderr so stdout stays a clean
//! fragment protocol.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use sudoku_live::puzzle::Generator;
use sudoku_live::{Config, Engine, EngineMessage, parse_event, render};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config()?;
    info!("starting sudoku session server");

    if let Err(err) = run(config).await {
        // Surface the failure to connected clients before dying.
        println!("{}", render::overlay(&err.to_string(), "error"));
        error!(error = %err, "server stopped");
        return Err(err);
    }

    Ok(())
}

/// Wires stdin, the engine and stdout together and runs until the engine
/// fails or stdin closes.
async fn run(config: Config) -> Result<()> {
    let source = match config.seed() {
        Some(seed) => Generator::with_seed(*seed),
        None => Generator::new(),
    };

    let (view_tx, mut view_rx) = mpsc::unbounded_channel();
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let engine = Engine::new(source, config, msg_tx.clone(), view_tx);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(update) = view_rx.recv().await {
            for fragment in render::fragments(&update) {
                let line = format!("{fragment}\n");
                if stdout.write_all(line.as_bytes()).await.is_err() {
                    return;
                }
            }
            if stdout.flush().await.is_err() {
                return;
            }
        }
    });

    let mut engine_task = tokio::spawn(engine.run(msg_rx));

    let feed = async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let event = match serde_json::from_str(&line) {
                Ok(data) => parse_event(&data),
                Err(err) => {
                    debug!(%err, "dropping undecodable input line");
                    continue;
                }
            };
            if msg_tx.send(EngineMessage::Client(event)).is_err() {
                break;
            }
        }
        anyhow::Ok(())
    };
    tokio::pin!(feed);

    tokio::select! {
        result = &mut engine_task => result??,
        result = &mut feed => {
            result?;
            info!("stdin closed, shutting down");
            engine_task.abort();
        }
    }

    let _ = writer.await;
    Ok(())
}

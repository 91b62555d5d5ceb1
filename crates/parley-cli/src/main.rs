//! Parley terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server as Alice and join room r1 once in the lobby
//! parley --name Alice --room r1
//!
//! # Another server, verbose logging
//! parley --url ws://chat.example:8080/ws/ --name Bob --log-level debug
//! ```

use clap::Parser;
use parley_app::{DEFAULT_URL, Session, SessionConfig};
use parley_client::websocket::WsTransport;
use parley_core::SystemEnv;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parley chat client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Line-oriented client for Parley chat servers")]
#[command(version)]
struct Args {
    /// WebSocket URL of the chat server
    #[arg(short, long, default_value = DEFAULT_URL)]
    url: String,

    /// Display name
    #[arg(short, long)]
    name: String,

    /// Room to join once the lobby is reached
    #[arg(short, long)]
    room: Option<String>,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so they do not interleave with the chat on stdout.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(url = %args.url, name = %args.name, "parley starting");

    let config = SessionConfig::with_url(args.url);
    let (session, runtime) = Session::spawn(WsTransport::new(), SystemEnv::new(), config);
    session.login(args.name).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    parley_cli::repl::run(&session, stdin, &mut stdout, args.room).await?;

    drop(session);
    runtime.await?;

    Ok(())
}

//! scorekv server binary.
//!
//! Parses the command line, installs the tracing subscriber, builds the
//! shared keyspace and leaderboard, and serves clients until Ctrl+C.

use scorekv::config::{CliAction, Config};
use scorekv::server::Server;
use scorekv::storage::{Leaderboard, StorageEngine, NUM_SHARDS};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        r#"
scorekv - An in-memory data server with a score leaderboard

USAGE:
    scorekv [OPTIONS]

OPTIONS:
    -h, --host <HOST>         Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>         Port to listen on (default: 6379)
        --alt-port            Listen on the alternate port 6380
        --log-level <LEVEL>   Log filter when RUST_LOG is unset (default: info)
    -v, --version             Print version information
        --help                Print this help message

EXAMPLES:
    scorekv                        # Start on 127.0.0.1:6379
    scorekv --alt-port             # Start on 127.0.0.1:6380
    scorekv --host 0.0.0.0         # Listen on all interfaces

CONNECTING:
    Use redis-cli, or type commands directly over telnet:
    $ redis-cli -p 6379
    127.0.0.1:6379> LBADD alice 50
    OK
    127.0.0.1:6379> LBTOP 1
    1) "alice"
    2) "50"
"#
    );
}

fn print_banner(config: &Config) {
    println!(
        r#"
scorekv v{}
──────────────────────────────────────────────────────────────
Server started on {}
Ready to accept connections.

Use Ctrl+C to shutdown gracefully.
"#,
        scorekv::VERSION,
        config.bind_address()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(CliAction::Run(config)) => config,
        Ok(CliAction::Help) => {
            print_help();
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("scorekv version {}", scorekv::VERSION);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let storage = Arc::new(StorageEngine::new());
    let leaderboard = Arc::new(Leaderboard::new());
    info!("Storage engine initialized with {} shards", NUM_SHARDS);

    let server = Server::new(storage, leaderboard);

    let listener = TcpListener::bind(config.bind_address()).await?;
    print_banner(&config);
    info!("Listening on {}", config.bind_address());

    tokio::select! {
        _ = server.run(listener) => {}
        result = signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received, stopping server...");
        }
    }

    let keys = server.storage().stats();
    info!(
        keys = keys.keys,
        expired = keys.expired,
        players = server.leaderboard().len(),
        "Server shutdown complete"
    );
    Ok(())
}

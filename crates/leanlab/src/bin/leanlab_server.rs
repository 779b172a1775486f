//! Leanlab REST Server
//!
//! HTTP API for submitting ideas, saving revisions and comparing versions.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use leanlab::config::Settings;
use leanlab::server::startup::start_server;

#[derive(Parser)]
#[command(name = "leanlab_server")]
#[command(about = "Leanlab REST API Server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, env = "LEANLAB_BIND", default_value = "127.0.0.1:4000")]
  bind: SocketAddr,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();
  let args = Args::parse();

  let filter = if args.verbose { EnvFilter::new("info") } else { EnvFilter::new("leanlab=info,tower_http=info,warn") };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  info!("Starting Leanlab REST Server v{}", env!("CARGO_PKG_VERSION"));
  let settings = Settings::from_env()?;
  start_server(args.bind, settings).await
}

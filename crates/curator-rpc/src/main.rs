//! Curator RPC Server - JSON-RPC front end for the plugin curator.
//!
//! This binary wraps the curator-core library in a JSON-RPC 2.0 server so a
//! host (admin UI, plugin-directory proxy) can query the curated listing and
//! run the administrative operations over HTTP.

mod handler;
mod server;
mod wrapper;

use anyhow::Result;
use clap::Parser;
use curator_core::config::CacheConfig;
use curator_core::{CacheDuration, Curator, CuratorConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "curator-rpc")]
#[command(about = "JSON-RPC server for the plugin curator")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// URL of the remote JSON document listing curated slugs
    #[arg(long, env = "CURATOR_REMOTE_URL")]
    remote_url: Option<String>,

    /// Bearer credential sent with the remote document request
    #[arg(long, env = "CURATOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Cache TTL in seconds
    #[arg(long, default_value_t = CacheConfig::DEFAULT_TTL_SECS)]
    cache_ttl_secs: u64,

    /// SQLite cache database (defaults to the user cache directory)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Keep the cache in memory instead of SQLite
    #[arg(long)]
    memory_cache: bool,

    /// Catalog API host
    #[arg(long)]
    catalog_base: Option<String>,

    /// Pause between catalog requests in milliseconds
    #[arg(long)]
    request_delay_ms: Option<u64>,
}

fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("plugin-curator")
        .join(CacheConfig::DB_FILENAME)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting Curator RPC Server");

    let mut config = CuratorConfig::default().with_cache_ttl(Duration::from_secs(args.cache_ttl_secs));
    config.remote_url = args.remote_url;
    config.api_key = args.api_key;

    match CacheDuration::from_secs(args.cache_ttl_secs) {
        Some(preset) => info!("Cache duration: {}", preset.label()),
        None => warn!(
            "Cache TTL of {}s does not match a preset duration",
            args.cache_ttl_secs
        ),
    }
    if config.remote_url().is_none() {
        warn!("No remote URL configured; featured queries will use the default listing");
    }

    let mut builder = Curator::builder(config);
    if args.memory_cache {
        builder = builder.with_memory_cache();
    } else {
        let db_path = args.db_path.unwrap_or_else(default_db_path);
        info!("Cache database: {}", db_path.display());
        builder = builder.with_sqlite_cache(db_path);
    }
    if let Some(base) = args.catalog_base {
        builder = builder.with_catalog_base(base);
    }
    if let Some(delay_ms) = args.request_delay_ms {
        builder = builder.with_request_delay(Duration::from_millis(delay_ms));
    }

    let curator = builder.build()?;

    // Start the server
    let addr = server::start_server(curator, &args.host, args.port).await?;

    // Print port for the host process to read (intentional stdout for IPC)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}

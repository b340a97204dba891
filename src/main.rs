//! ragcache - inspect and check cache engine configurations

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use ragcache::{CacheBackend, CacheConfig, Config, utils::logging::init_tracing};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "ragcache", version, about = "Multi-level RAG cache engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a configuration file and print the resolved cache layers
    Check {
        /// Path to the YAML configuration
        #[arg(env = "RAGCACHE_CONFIG")]
        config: PathBuf,
    },
    /// Health-check the configured remote store
    Ping {
        /// Path to the YAML configuration
        #[arg(env = "RAGCACHE_CONFIG")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Check { config } => {
            let config = load(&config).await?;
            print_plan(&config.cache);
            Ok(())
        }
        Command::Ping { config } => {
            let config = load(&config).await?;
            let backend = CacheBackend::from_config(&config.cache, 1, None)?;
            backend
                .health_check()
                .await
                .context("remote store is unreachable")?;
            println!("{} backend is healthy", backend.kind());
            Ok(())
        }
    }
}

async fn load(path: &Path) -> anyhow::Result<Config> {
    let config = Config::from_file(path)
        .await
        .with_context(|| format!("loading {}", path.display()))?;
    init_tracing(&config.logging);
    Ok(config)
}

fn print_plan(cache: &CacheConfig) {
    println!("backend:      {}", cache.cache_backend);
    println!("key strategy: {}", cache.cache_key_strategy);
    if let Some(compression) = cache.compression() {
        println!("compression:  {}", compression);
    }

    let layers = [
        ("query", cache.query_cache_enabled, cache.query_cache_size_mb, cache.query_ttl()),
        (
            "embedding",
            cache.embedding_cache_enabled,
            cache.embedding_cache_size_mb,
            cache.embedding_ttl(),
        ),
        ("result", cache.result_cache_enabled, cache.result_cache_size_mb, cache.result_ttl()),
    ];
    for (name, enabled, size_mb, ttl) in layers {
        if !enabled {
            println!("{:<10} disabled", name);
            continue;
        }
        let ttl = ttl.map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));
        println!(
            "{:<10} {} items, ttl {}",
            name,
            cache.max_items(size_mb),
            ttl
        );
    }

    println!(
        "batching:     size {}, timeout {}ms, queue {}",
        cache.batch_size, cache.batch_timeout_ms, cache.queue_max_size
    );
}

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cedict_popup::rate_limit::RateLimitLayer;
use cedict_popup::{AppState, IndexCache, LoaderConfig, router};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ARTIFACT: &str = "index.json";
const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!("index artifact at {}", config.artifact_path.display());
    match &config.cache_dir {
        Some(dir) => info!(
            "persistent index cache at {} (tag {})",
            dir.display(),
            config.version_tag
        ),
        None => info!("persistent index cache disabled"),
    }
    info!(
        "rate limit: {} req/s (burst {})",
        config.rate_limit_rps, config.rate_limit_burst
    );

    let cache = Arc::new(IndexCache::new(LoaderConfig {
        artifact_path: config.artifact_path,
        cache_dir: config.cache_dir,
        version_tag: config.version_tag,
    }));

    if config.preload {
        // Warm start: kick the load now instead of on the first lookup. A
        // failure here is retried by the first request, not fatal.
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            if let Err(err) = cache.get_or_load().await {
                warn!("index preload failed: {err:#}");
            }
        });
    }

    let state = AppState { cache };
    let app = router(state)
        .layer(RateLimitLayer::new(
            config.rate_limit_rps,
            config.rate_limit_burst,
        ))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid listen address");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Clone, Debug)]
struct Config {
    host: String,
    port: u16,
    artifact_path: PathBuf,
    cache_dir: Option<PathBuf>,
    version_tag: String,
    preload: bool,
    rate_limit_rps: u32,
    rate_limit_burst: u32,
}

fn load_config() -> Config {
    let mut preload = false;
    let mut cli_artifact: Option<PathBuf> = None;
    let mut cli_cache_dir: Option<PathBuf> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--preload" => preload = true,
            _ => {
                if let Some(path) = arg.strip_prefix("--artifact=") {
                    cli_artifact = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--cache-dir=") {
                    cli_cache_dir = Some(PathBuf::from(path));
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let artifact_path = cli_artifact
        .or_else(|| env::var("ARTIFACT_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT));
    let cache_dir = cli_cache_dir
        .or_else(|| env::var("CACHE_DIR").ok().map(PathBuf::from))
        .filter(|dir| !dir.as_os_str().is_empty());
    let version_tag =
        env::var("VERSION_TAG").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
    let rate_limit_rps = env::var("RATE_LIMIT_RPS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_RPS);
    let rate_limit_burst = env::var("RATE_LIMIT_BURST")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_BURST);

    Config {
        host,
        port,
        artifact_path,
        cache_dir,
        version_tag,
        preload,
        rate_limit_rps,
        rate_limit_burst,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

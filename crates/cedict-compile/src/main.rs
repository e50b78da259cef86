use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEXICON: &str = "cedict_ts.u8";
const DEFAULT_ARTIFACT: &str = "index.json";

/// Usage: `cedict-compile [<lexicon> [<artifact>]]`, with `LEXICON_PATH` /
/// `ARTIFACT_PATH` as env fallbacks.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let (lexicon_path, artifact_path) = load_paths();
    info!("compiling {}", lexicon_path.display());

    let start = Instant::now();
    let index = cedict_compile::compile_file(&lexicon_path)
        .with_context(|| format!("compile {}", lexicon_path.display()))?;
    info!(
        "compiled {} keys in {} ms",
        index.key_count(),
        start.elapsed().as_millis()
    );

    let file = File::create(&artifact_path)
        .with_context(|| format!("create {}", artifact_path.display()))?;
    serde_json::to_writer(BufWriter::new(file), &index)
        .with_context(|| format!("write {}", artifact_path.display()))?;
    info!("wrote {}", artifact_path.display());

    Ok(())
}

fn load_paths() -> (PathBuf, PathBuf) {
    let mut args = env::args().skip(1);
    let lexicon = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::var("LEXICON_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEXICON));
    let artifact = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::var("ARTIFACT_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT));
    (lexicon, artifact)
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

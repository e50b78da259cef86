//! Process-wide index cache: load once, share everywhere, retry on failure.
//!
//! The first caller of [`IndexCache::get_or_load`] starts the load; callers
//! arriving while it is in flight await the same attempt instead of starting
//! another. A failed attempt leaves the slot empty so the next caller retries
//! — "loading" is never a terminal state.
//!
//! An optional persistent cache (a directory holding a version-tag file and
//! the serialized index) short-circuits the artifact read across restarts.
//! The cache is valid only when its stored tag equals the current tag; any
//! mismatch, read error, or corrupt blob degrades to the primary artifact,
//! followed by a best-effort atomic write-back.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use cedict_types::DictionaryIndex;

const CACHE_TAG_FILE: &str = "version";
const CACHE_DATA_FILE: &str = "index.json";

/// Where the index comes from and where the warm copy lives.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Primary artifact produced by `cedict-compile`.
    pub artifact_path: PathBuf,
    /// Persistent cache directory; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Tag the cache must carry to count as fresh. Changing it (e.g. on a new
    /// release) invalidates the cache wholesale.
    pub version_tag: String,
}

/// Shared in-memory index with at-most-one concurrent load.
pub struct IndexCache {
    config: LoaderConfig,
    cell: OnceCell<Arc<DictionaryIndex>>,
}

impl IndexCache {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// The index if a previous load completed, without triggering one.
    pub fn ready(&self) -> Option<Arc<DictionaryIndex>> {
        self.cell.get().cloned()
    }

    /// Get the shared index, loading it on first use.
    ///
    /// Concurrent callers attach to the in-flight load; an error is returned
    /// to every waiter and the slot stays empty for the next attempt.
    pub async fn get_or_load(&self) -> Result<Arc<DictionaryIndex>> {
        let index = self.cell.get_or_try_init(|| self.load()).await?;
        Ok(Arc::clone(index))
    }

    async fn load(&self) -> Result<Arc<DictionaryIndex>> {
        let start = Instant::now();

        if let Some(index) = self.load_from_cache().await {
            info!(
                "index loaded from cache in {} ms ({} keys)",
                start.elapsed().as_millis(),
                index.key_count()
            );
            return Ok(Arc::new(index));
        }

        let bytes = tokio::fs::read(&self.config.artifact_path)
            .await
            .with_context(|| format!("read {}", self.config.artifact_path.display()))?;
        let index: DictionaryIndex = serde_json::from_slice(&bytes)
            .with_context(|| format!("corrupt index artifact {}", self.config.artifact_path.display()))?;
        info!(
            "index loaded from artifact in {} ms ({} keys)",
            start.elapsed().as_millis(),
            index.key_count()
        );

        self.write_back(bytes).await;
        Ok(Arc::new(index))
    }

    /// A valid cache hit needs a matching version tag and a deserializable
    /// data file; everything else is a miss.
    async fn load_from_cache(&self) -> Option<DictionaryIndex> {
        let dir = self.config.cache_dir.as_deref()?;
        let tag = tokio::fs::read_to_string(dir.join(CACHE_TAG_FILE))
            .await
            .ok()?;
        if tag.trim() != self.config.version_tag {
            info!(
                "cache version tag {:?} does not match {:?}; rebuilding",
                tag.trim(),
                self.config.version_tag
            );
            return None;
        }
        let bytes = tokio::fs::read(dir.join(CACHE_DATA_FILE)).await.ok()?;
        if bytes.is_empty() {
            return None;
        }
        match serde_json::from_slice(&bytes) {
            Ok(index) => Some(index),
            Err(err) => {
                warn!("discarding corrupt index cache: {err}");
                None
            }
        }
    }

    /// Best-effort write-back of the freshly loaded blob and the current tag.
    /// Failures are logged, never fatal.
    async fn write_back(&self, bytes: Vec<u8>) {
        let Some(dir) = self.config.cache_dir.clone() else {
            return;
        };
        let tag = self.config.version_tag.clone();
        let result =
            tokio::task::spawn_blocking(move || write_cache_files(&dir, &tag, &bytes)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("index cache write-back failed: {err:#}"),
            Err(err) => warn!("index cache write-back panicked: {err}"),
        }
    }
}

/// Atomic write: temp file in the cache dir, then persist over the target.
/// The data file lands before the tag so a crash in between leaves a stale
/// tag pointing at fresh data, which the next load treats as a plain miss.
fn write_cache_files(dir: &Path, tag: &str, bytes: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    persist(dir, CACHE_DATA_FILE, bytes)?;
    persist(dir, CACHE_TAG_FILE, tag.as_bytes())?;
    Ok(())
}

fn persist(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let file = NamedTempFile::new_in(dir).context("create temp cache file")?;
    std::fs::write(file.path(), bytes).context("write temp cache file")?;
    file.persist(dir.join(name))
        .with_context(|| format!("persist {name}"))?;
    Ok(())
}

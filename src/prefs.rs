//! Persisted preferences.
//!
//! [`KeyValueStore`] is the storage seam: reads are synchronous, writes are
//! queued and land on disk asynchronously. [`JsonFileStore`] keeps the whole
//! map in memory and funnels every write through one background task, so
//! writes reach the file in the order they were issued.
//!
//! [`Pref`] binds a key to a typed value encoded as JSON and caches the
//! decoded value until the next `set`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

pub type Result<T> = std::result::Result<T, PrefsError>;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid preference data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preference writer has shut down")]
    Closed,
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// String key-value storage with synchronous reads and queued writes.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Record `value` under `key`. The in-memory view is updated before this
    /// returns; persistence may complete later.
    fn put(&self, key: &str, value: String) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

type PrefMap = BTreeMap<String, String>;

enum WriteOp {
    Save(PrefMap),
    Flush(oneshot::Sender<()>),
}

/// A JSON object file of string values.
///
/// Must be opened inside a tokio runtime; the writer task is spawned on it.
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<PrefMap>,
    tx: mpsc::UnboundedSender<WriteOp>,
}

impl JsonFileStore {
    /// Load `path` (a missing file is an empty store) and start the writer.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = load_map(&path)?;
        tracing::debug!(path = %path.display(), keys = values.len(), "prefs loaded");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(path.clone(), rx));

        Ok(Self {
            path,
            values: Mutex::new(values),
            tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriteOp::Flush(done_tx))
            .map_err(|_| PrefsError::Closed)?;
        done_rx.await.map_err(|_| PrefsError::Closed)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        let snapshot = {
            let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
            values.insert(key.to_string(), value);
            values.clone()
        };
        self.tx
            .send(WriteOp::Save(snapshot))
            .map_err(|_| PrefsError::Closed)
    }
}

fn load_map(path: &Path) -> Result<PrefMap> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(PrefMap::new()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PrefMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Sibling file the map is written to before being renamed into place.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace the file at `path` with `values`. The rename keeps a crash
/// mid-write from leaving a truncated file behind.
async fn write_map(path: &Path, values: &PrefMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(values)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Drain queued writes in order until every store handle is dropped.
async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriteOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::Save(values) => {
                if let Err(e) = write_map(&path, &values).await {
                    tracing::warn!(path = %path.display(), error = %e, "failed to write prefs");
                }
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Typed preference
// ---------------------------------------------------------------------------

/// A key bound to a JSON-encoded value of type `T`, with a read cache.
///
/// Nothing cached means the next `get` reads from the store again.
#[derive(Debug)]
pub struct Pref<T> {
    key: String,
    cached: Option<T>,
}

impl<T> Pref<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cached: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cached value, or the decoded stored value when nothing is cached.
    ///
    /// A missing or empty stored string, or JSON `null`, reads as `None`.
    pub fn get(&mut self, store: &dyn KeyValueStore) -> Result<Option<T>> {
        if self.cached.is_none() {
            self.cached = match store.get(&self.key)? {
                Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
                _ => None,
            };
        }
        Ok(self.cached.clone())
    }

    /// Replace the cached value and queue the encoded value for storage.
    pub fn set(&mut self, store: &dyn KeyValueStore, value: Option<T>) -> Result<()> {
        let encoded = serde_json::to_string(&value)?;
        self.cached = value;
        store.put(&self.key, encoded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

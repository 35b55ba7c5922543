use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::error::StoreError;
use crate::session::Session;

/// Durable slot holding one whole-session snapshot.
pub trait SessionStore {
    /// `Ok(None)` when nothing usable is stored.
    fn load(&self) -> Result<Option<Session>, StoreError>;
    fn save(&self, session: &Session) -> Result<(), StoreError>;
}

/// Decodes a snapshot, treating anything malformed as absent.
fn decode(raw: &str, origin: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) if session.current_challenge.iter().all(|c| c.is_well_formed()) => {
            Some(session)
        }
        Ok(_) => {
            warn!("Ignoring corrupt snapshot in {}: challenge days out of range", origin);
            None
        }
        Err(e) => {
            warn!("Ignoring corrupt snapshot in {}: {}", origin, e);
            None
        }
    }
}

/// Pretty JSON file at `<data_dir>/<store_key>.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.snapshot_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(decode(&content, &self.path.display().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        // Readers see the old snapshot or the new one, never a partial write.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps the serialized snapshot in memory. Useful for embedding and tests.
#[derive(Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw text, as if another process had written it.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self
            .blob
            .borrow()
            .as_deref()
            .and_then(|raw| decode(raw, "memory")))
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.blob.borrow_mut() = Some(serde_json::to_string(session)?);
        Ok(())
    }
}

/// The stored session, or a fresh one when the slot is empty, corrupt or
/// unreadable.
pub fn load_or_default<S: SessionStore + ?Sized>(store: &S, cfg: &Config) -> Session {
    match store.load() {
        Ok(Some(session)) => session,
        Ok(None) => Session::from_config(cfg),
        Err(e) => {
            warn!("Snapshot unavailable, starting fresh: {}", e);
            Session::from_config(cfg)
        }
    }
}

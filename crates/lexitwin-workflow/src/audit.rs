//! Raw-generation-response audit cache.
//!
//! Each generation call's raw textual response is kept for audit display,
//! keyed by rule id and artifact kind, in a durable slot outside backend
//! control. The cache is injected into the session so tests can use the
//! in-memory implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use lexitwin_core::ArtifactKind;
use lexitwin_core::model::GenerationBundle;

use crate::store::ArtifactStore;

/// Durable slot for raw generation responses, one map per rule.
pub trait AuditCache: Send + Sync {
    fn load(&self, dtl_id: &str) -> Result<HashMap<ArtifactKind, String>, std::io::Error>;
    fn store(
        &self,
        dtl_id: &str,
        entries: &HashMap<ArtifactKind, String>,
    ) -> Result<(), std::io::Error>;
}

impl<T: AuditCache + ?Sized> AuditCache for std::sync::Arc<T> {
    fn load(&self, dtl_id: &str) -> Result<HashMap<ArtifactKind, String>, std::io::Error> {
        (**self).load(dtl_id)
    }

    fn store(
        &self,
        dtl_id: &str,
        entries: &HashMap<ArtifactKind, String>,
    ) -> Result<(), std::io::Error> {
        (**self).store(dtl_id, entries)
    }
}

/// In-memory cache for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryAuditCache {
    inner: Mutex<HashMap<String, HashMap<ArtifactKind, String>>>,
}

impl MemoryAuditCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditCache for MemoryAuditCache {
    fn load(&self, dtl_id: &str) -> Result<HashMap<ArtifactKind, String>, std::io::Error> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| std::io::Error::other("audit cache lock poisoned"))?;
        Ok(inner.get(dtl_id).cloned().unwrap_or_default())
    }

    fn store(
        &self,
        dtl_id: &str,
        entries: &HashMap<ArtifactKind, String>,
    ) -> Result<(), std::io::Error> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| std::io::Error::other("audit cache lock poisoned"))?;
        inner.insert(dtl_id.to_string(), entries.clone());
        Ok(())
    }
}

/// File-backed cache: one JSON file per rule under a base directory.
#[derive(Debug)]
pub struct FileAuditCache {
    dir: PathBuf,
}

impl FileAuditCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, dtl_id: &str) -> PathBuf {
        // Rule ids come from the backend; anything path-hostile is mapped
        // to a flat name.
        let safe: String = dtl_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl AuditCache for FileAuditCache {
    fn load(&self, dtl_id: &str) -> Result<HashMap<ArtifactKind, String>, std::io::Error> {
        let path = self.path_for(dtl_id);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(std::io::Error::other)
    }

    fn store(
        &self,
        dtl_id: &str,
        entries: &HashMap<ArtifactKind, String>,
    ) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
        std::fs::write(self.path_for(dtl_id), text)
    }
}

/// The working raw-response map of one session.
///
/// Merge policy: last writer wins per kind; loading a session fills in
/// kinds that have no cached entry yet from the artifacts themselves, and
/// never clobbers an existing entry.
#[derive(Debug, Default, Clone)]
pub struct RawResponses {
    entries: HashMap<ArtifactKind, String>,
}

impl RawResponses {
    pub fn new(entries: HashMap<ArtifactKind, String>) -> Self {
        Self { entries }
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        self.entries.get(&kind).map(String::as_str)
    }

    pub fn set(&mut self, kind: ArtifactKind, raw: String) {
        self.entries.insert(kind, raw);
    }

    pub fn entries(&self) -> &HashMap<ArtifactKind, String> {
        &self.entries
    }

    /// Replace all five entries at once (bulk generation).
    pub fn replace_all(&mut self, bundle: &GenerationBundle) {
        self.entries.insert(ArtifactKind::Ontology, bundle.ontology_raw.clone());
        self.entries.insert(ArtifactKind::Interface, bundle.interface_raw.clone());
        self.entries
            .insert(ArtifactKind::Configuration, bundle.configuration_raw.clone());
        self.entries.insert(ArtifactKind::Tests, bundle.tests_raw.clone());
        self.entries.insert(ArtifactKind::Logic, bundle.logic_raw.clone());
    }

    /// Fill kinds that have no entry yet from freshly loaded artifacts.
    pub fn fill_from_store(&mut self, store: &ArtifactStore) {
        if !self.entries.contains_key(&ArtifactKind::Ontology) {
            if let Some(payload) = store.ontology.current() {
                if !payload.ontology_owl.is_empty() {
                    let raw = payload
                        .raw_response
                        .clone()
                        .unwrap_or_else(|| payload.ontology_owl.clone());
                    self.entries.insert(ArtifactKind::Ontology, raw);
                }
            }
        }
        if !self.entries.contains_key(&ArtifactKind::Interface) {
            if let Some(spec) = store.interface.current() {
                if let Ok(raw) = serde_json::to_string_pretty(spec) {
                    self.entries.insert(ArtifactKind::Interface, raw);
                }
            }
        }
        if !self.entries.contains_key(&ArtifactKind::Configuration) {
            if let Some(payload) = store.configuration.current() {
                if !payload.configuration_owl.is_empty() {
                    let raw = payload
                        .raw_response
                        .clone()
                        .unwrap_or_else(|| payload.configuration_owl.clone());
                    self.entries.insert(ArtifactKind::Configuration, raw);
                }
            }
        }
        if !self.entries.contains_key(&ArtifactKind::Tests) {
            if let Some(cases) = store.tests.current() {
                if !cases.is_empty() {
                    if let Ok(raw) = serde_json::to_string_pretty(cases) {
                        self.entries.insert(ArtifactKind::Tests, raw);
                    }
                }
            }
        }
        if !self.entries.contains_key(&ArtifactKind::Logic) {
            if let Some(payload) = store.logic.current() {
                if !payload.code.is_empty() {
                    self.entries.insert(ArtifactKind::Logic, payload.code.clone());
                }
            }
        }
    }
}

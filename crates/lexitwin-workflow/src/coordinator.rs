//! Orchestration of generation calls.
//!
//! One in-flight generation per kind per rule; duplicates are rejected
//! rather than double-fired. Bulk generation replaces all five artifacts
//! and all five audit entries in one batch, or nothing at all.

use std::collections::HashSet;

use lexitwin_client::{ApiError, DtlBackend};
use lexitwin_core::ArtifactKind;
use tracing::info;

use crate::audit::RawResponses;
use crate::progress::ProgressEstimate;
use crate::store::ArtifactStore;
use crate::WorkflowError;

#[derive(Debug, Default)]
pub struct GenerationCoordinator {
    in_flight: HashSet<ArtifactKind>,
    bulk_active: bool,
    progress: ProgressEstimate,
}

impl GenerationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generating(&self, kind: ArtifactKind) -> bool {
        self.in_flight.contains(&kind)
    }

    pub fn is_generating_all(&self) -> bool {
        self.bulk_active
    }

    /// Progress of the most recent generation, 0–100.
    pub fn progress_percent(&self) -> f32 {
        self.progress.percent()
    }

    /// Draft one artifact from the rule's legal text and prior artifacts.
    ///
    /// On success the artifact slot and its audit entry are replaced; a
    /// "no content" response leaves both untouched. Failure changes
    /// nothing.
    pub async fn generate(
        &mut self,
        backend: &dyn DtlBackend,
        store: &mut ArtifactStore,
        raw: &mut RawResponses,
        kind: ArtifactKind,
    ) -> Result<(), WorkflowError> {
        self.begin(kind)?;
        info!(kind = %kind, dtl = store.dtl_id(), "generating artifact");

        let result = self.generate_inner(backend, store, raw, kind).await;

        self.end(kind);
        result
    }

    /// Mark a kind in flight; a duplicate request is rejected.
    fn begin(&mut self, kind: ArtifactKind) -> Result<(), WorkflowError> {
        if !self.in_flight.insert(kind) {
            return Err(WorkflowError::AlreadyGenerating(kind));
        }
        self.progress.start();
        Ok(())
    }

    fn end(&mut self, kind: ArtifactKind) {
        self.in_flight.remove(&kind);
        self.progress.finish();
    }

    async fn generate_inner(
        &mut self,
        backend: &dyn DtlBackend,
        store: &mut ArtifactStore,
        raw: &mut RawResponses,
        kind: ArtifactKind,
    ) -> Result<(), WorkflowError> {
        let dtlib_id = store.dtlib_id().to_string();
        let dtl_id = store.dtl_id().to_string();
        match kind {
            ArtifactKind::Ontology => {
                if let Some(payload) = backend.generate_ontology(&dtlib_id, &dtl_id).await? {
                    let raw_text = payload
                        .raw_response
                        .clone()
                        .unwrap_or_else(|| payload.ontology_owl.clone());
                    store.ontology.hydrate(payload);
                    raw.set(kind, raw_text);
                }
            }
            ArtifactKind::Interface => {
                if let Some(spec) = backend.generate_interface(&dtlib_id, &dtl_id).await? {
                    let raw_text = serde_json::to_string_pretty(&spec).map_err(ApiError::from)?;
                    store.interface.hydrate(spec);
                    raw.set(kind, raw_text);
                }
            }
            ArtifactKind::Configuration => {
                if let Some(payload) = backend.generate_configuration(&dtlib_id, &dtl_id).await? {
                    let raw_text = payload
                        .raw_response
                        .clone()
                        .unwrap_or_else(|| payload.configuration_owl.clone());
                    store.configuration.hydrate(payload);
                    raw.set(kind, raw_text);
                }
            }
            ArtifactKind::Tests => {
                if let Some(cases) = backend.generate_tests(&dtlib_id, &dtl_id).await? {
                    let raw_text = serde_json::to_string_pretty(&cases).map_err(ApiError::from)?;
                    store.tests.hydrate(cases);
                    raw.set(kind, raw_text);
                }
            }
            ArtifactKind::Logic => {
                if let Some(payload) = backend.generate_logic(&dtlib_id, &dtl_id).await? {
                    let raw_text = payload.code.clone();
                    store.logic.hydrate(payload);
                    raw.set(kind, raw_text);
                }
            }
        }
        Ok(())
    }

    /// Draft all five artifacts in one atomic backend call.
    ///
    /// On success all five slots and all five audit entries are replaced
    /// as a batch; on failure the store and audit map are exactly as they
    /// were before the call.
    pub async fn generate_all(
        &mut self,
        backend: &dyn DtlBackend,
        store: &mut ArtifactStore,
        raw: &mut RawResponses,
    ) -> Result<(), WorkflowError> {
        if self.bulk_active {
            return Err(WorkflowError::BulkGenerationInProgress);
        }
        self.bulk_active = true;
        self.progress.start();
        info!(dtl = store.dtl_id(), "generating all artifacts");

        let result = backend
            .generate_all(store.dtlib_id(), store.dtl_id())
            .await;

        self.bulk_active = false;
        self.progress.finish();

        let bundle = result?;
        store.apply_bundle(&bundle);
        raw.replace_all(&bundle);
        Ok(())
    }
}

//! The per-rule authoring session.
//!
//! Owns the stage sequencer, the artifact store, the generation
//! coordinator and the working raw-response map, and is the only path
//! through which a rule's review status changes. All mutation goes
//! through `&mut self`, so writes are serialized per session; stale
//! responses from an abandoned session are dropped by the artifact
//! store's rule-id guard.

use lexitwin_client::DtlBackend;
use lexitwin_core::model::{
    Dtl, InterfaceSpec, LogicPayload, NewComment, NewTestCase, OntologyPayload, ReviewStatus,
    TestCase, TestCasePatch,
};
use lexitwin_core::wire::DtlPatch;
use lexitwin_core::{ArtifactKind, Completion, ConfigurationPayload, Sequencer, Stage};
use tracing::info;

use crate::audit::{AuditCache, RawResponses};
use crate::coordinator::GenerationCoordinator;
use crate::store::ArtifactStore;
use crate::WorkflowError;

pub struct Session<B: DtlBackend, A: AuditCache> {
    backend: B,
    audit: A,
    dtlib_id: String,
    dtl: Dtl,
    sequencer: Sequencer,
    store: ArtifactStore,
    coordinator: GenerationCoordinator,
    raw: RawResponses,
    loading: bool,
    last_error: Option<String>,
}

impl<B: DtlBackend, A: AuditCache> Session<B, A> {
    /// Open an authoring session for one rule.
    ///
    /// Always starts at the Metadata stage; the audit map is seeded from
    /// the durable cache.
    pub fn open(backend: B, audit: A, dtlib_id: String, dtl: Dtl) -> Result<Self, WorkflowError> {
        let raw = RawResponses::new(audit.load(&dtl.id)?);
        let store = ArtifactStore::new(dtlib_id.clone(), dtl.id.clone());
        Ok(Self {
            backend,
            audit,
            dtlib_id,
            dtl,
            sequencer: Sequencer::new(),
            store,
            coordinator: GenerationCoordinator::new(),
            raw,
            loading: false,
            last_error: None,
        })
    }

    // ── State exposed to the UI ──

    pub fn dtl(&self) -> &Dtl {
        &self.dtl
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn raw_response(&self, kind: ArtifactKind) -> Option<&str> {
        self.raw.get(kind)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn is_generating(&self, kind: ArtifactKind) -> bool {
        self.coordinator.is_generating(kind)
    }

    pub fn is_generating_all(&self) -> bool {
        self.coordinator.is_generating_all()
    }

    pub fn progress_percent(&self) -> f32 {
        self.coordinator.progress_percent()
    }

    pub fn completion(&self) -> Completion {
        self.store.completion()
    }

    // ── Stage navigation ──

    pub fn current_stage(&self) -> Stage {
        self.sequencer.current()
    }

    pub fn go_to_stage(&mut self, stage: Stage) {
        self.sequencer.go_to(stage);
    }

    pub fn next_stage(&mut self) {
        self.sequencer.next();
    }

    pub fn previous_stage(&mut self) {
        self.sequencer.previous();
    }

    pub fn stage_visited(&self, stage: Stage) -> bool {
        self.sequencer.visited(stage)
    }

    // ── Loading ──

    /// Fetch all five artifacts; tolerates partial failure. Successfully
    /// loaded kinds stay usable even when the call returns an error.
    pub async fn load(&mut self) -> Result<(), WorkflowError> {
        self.loading = true;
        self.last_error = None;
        let result = self.store.load(&self.backend).await;
        // Fill audit entries for kinds the cache has not seen, then
        // persist, regardless of partial failure.
        self.raw.fill_from_store(&self.store);
        let audit = self.persist_audit();
        self.loading = false;
        // A load failure takes precedence over an audit write failure;
        // either way the flag clears and the error is recorded.
        self.note(result.and(audit))
    }

    // ── Editing and saving ──

    pub fn edit_ontology(&mut self, ontology_owl: String) {
        self.store.ontology.edit(OntologyPayload {
            ontology_owl,
            raw_response: None,
        });
    }

    pub fn edit_interface(&mut self, spec: InterfaceSpec) {
        self.store.interface.edit(spec);
    }

    pub fn edit_configuration(&mut self, configuration_owl: String) {
        self.store.configuration.edit(ConfigurationPayload {
            configuration_owl,
            raw_response: None,
        });
    }

    pub fn edit_logic(&mut self, language: String, code: String) {
        self.store.logic.edit(LogicPayload { language, code });
    }

    /// Discard local edits for one kind, reverting to the last value the
    /// server confirmed.
    pub fn cancel_edit(&mut self, kind: ArtifactKind) {
        match kind {
            ArtifactKind::Ontology => self.store.ontology.cancel(),
            ArtifactKind::Interface => self.store.interface.cancel(),
            ArtifactKind::Configuration => self.store.configuration.cancel(),
            ArtifactKind::Tests => self.store.tests.cancel(),
            ArtifactKind::Logic => self.store.logic.cancel(),
        }
    }

    pub async fn save_ontology(&mut self, ontology_owl: String) -> Result<(), WorkflowError> {
        let payload = OntologyPayload {
            ontology_owl,
            raw_response: None,
        };
        let result = self.store.save_ontology(&self.backend, payload).await;
        self.note(result)
    }

    pub async fn save_interface(&mut self, spec: InterfaceSpec) -> Result<(), WorkflowError> {
        let result = self.store.save_interface(&self.backend, spec).await;
        self.note(result)
    }

    pub async fn save_configuration(
        &mut self,
        configuration_owl: String,
    ) -> Result<(), WorkflowError> {
        let payload = ConfigurationPayload {
            configuration_owl,
            raw_response: None,
        };
        let result = self.store.save_configuration(&self.backend, payload).await;
        self.note(result)
    }

    pub async fn save_logic(
        &mut self,
        language: String,
        code: String,
    ) -> Result<(), WorkflowError> {
        let payload = LogicPayload { language, code };
        let result = self.store.save_logic(&self.backend, payload).await;
        self.note(result)
    }

    // ── Test cases ──

    pub async fn add_test(&mut self, new: NewTestCase) -> Result<TestCase, WorkflowError> {
        let result = self.store.create_test(&self.backend, new).await;
        self.note(result)
    }

    pub async fn update_test(
        &mut self,
        test_id: &str,
        patch: TestCasePatch,
    ) -> Result<TestCase, WorkflowError> {
        let result = self.store.update_test(&self.backend, test_id, patch).await;
        self.note(result)
    }

    pub async fn remove_test(&mut self, test_id: &str) -> Result<(), WorkflowError> {
        let result = self.store.delete_test(&self.backend, test_id).await;
        self.note(result)
    }

    pub async fn run_tests(&mut self) -> Result<Vec<TestCase>, WorkflowError> {
        let result = self.store.run_tests(&self.backend).await;
        self.note(result)
    }

    // ── Generation ──

    pub async fn generate(&mut self, kind: ArtifactKind) -> Result<(), WorkflowError> {
        let result = self
            .coordinator
            .generate(&self.backend, &mut self.store, &mut self.raw, kind)
            .await;
        let result = result.and_then(|()| self.persist_audit());
        self.note(result)
    }

    pub async fn generate_all(&mut self) -> Result<(), WorkflowError> {
        let result = self
            .coordinator
            .generate_all(&self.backend, &mut self.store, &mut self.raw)
            .await;
        let result = result.and_then(|()| self.persist_audit());
        self.note(result)
    }

    // ── Review ──

    /// Approve the rule. Permitted at any completion ratio; the ratio is
    /// advisory. Clears review comments; an optional closing comment goes
    /// to the comment log.
    pub async fn approve(&mut self, comment: Option<&str>) -> Result<(), WorkflowError> {
        let result = self.review(ReviewStatus::Approved, comment, "approval").await;
        self.note(result)
    }

    /// Send the rule back for revision. The comment is mandatory.
    pub async fn request_revision(&mut self, comment: &str) -> Result<(), WorkflowError> {
        if comment.trim().is_empty() {
            return self.note(Err(WorkflowError::MissingComment));
        }
        let result = self
            .review(ReviewStatus::RevisionRequested, Some(comment), "revision")
            .await;
        self.note(result)
    }

    async fn review(
        &mut self,
        status: ReviewStatus,
        comment: Option<&str>,
        comment_kind: &str,
    ) -> Result<(), WorkflowError> {
        let patch = DtlPatch {
            review_status: Some(status),
            ..Default::default()
        };
        info!(dtl = %self.dtl.id, status = status.as_str(), "updating review status");
        let updated = self
            .backend
            .update_dtl(&self.dtlib_id, &self.dtl.id, &patch)
            .await?;
        self.dtl = updated;
        match status {
            ReviewStatus::Approved => self.dtl.review_comments.clear(),
            _ => self.dtl.review_comments = comment.unwrap_or_default().to_string(),
        }
        if let Some(comment) = comment.filter(|c| !c.trim().is_empty()) {
            self.backend
                .add_comment(
                    &self.dtlib_id,
                    &self.dtl.id,
                    &NewComment {
                        comment: comment.to_string(),
                        kind: Some(comment_kind.to_string()),
                    },
                )
                .await?;
        }
        Ok(())
    }

    // ── Internals ──

    fn persist_audit(&mut self) -> Result<(), WorkflowError> {
        self.audit.store(&self.dtl.id, self.raw.entries())?;
        Ok(())
    }

    fn note<T>(&mut self, result: Result<T, WorkflowError>) -> Result<T, WorkflowError> {
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }
}

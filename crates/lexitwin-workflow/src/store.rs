//! Per-rule artifact state and its reconciliation with the backend.
//!
//! Each artifact kind lives in a [`Slot`]: the last value the server
//! confirmed plus the copy the user is editing. Edits stay local until an
//! explicit save; cancel reverts to the confirmed value, never to empty.
//! After a save the server's returned canonical value replaces both
//! copies, so server-side normalisation wins.

use lexitwin_client::DtlBackend;
use lexitwin_core::model::{
    ConfigurationPayload, InterfaceSpec, LogicPayload, NewTestCase, OntologyPayload, TestCase,
    TestCasePatch,
};
use lexitwin_core::{ArtifactKind, Completion, GenerationBundle};
use tracing::warn;

use crate::WorkflowError;

/// Editable-vs-saved pair for one artifact.
#[derive(Debug, Clone, Default)]
pub struct Slot<T: Clone> {
    saved: Option<T>,
    editing: Option<T>,
}

impl<T: Clone> Slot<T> {
    pub fn new() -> Self {
        Self {
            saved: None,
            editing: None,
        }
    }

    /// Accept a server value (load or generation): it becomes both the
    /// confirmed and the editable copy.
    pub fn hydrate(&mut self, value: T) {
        self.saved = Some(value.clone());
        self.editing = Some(value);
    }

    /// Accept the canonical value the server returned from a save.
    pub fn commit(&mut self, value: T) {
        self.hydrate(value);
    }

    /// Stage a local edit; the confirmed copy is untouched.
    pub fn edit(&mut self, value: T) {
        self.editing = Some(value);
    }

    /// Discard local edits, reverting to the last confirmed value.
    pub fn cancel(&mut self) {
        self.editing = self.saved.clone();
    }

    /// The value to display: local edit if any, else the confirmed copy.
    pub fn current(&self) -> Option<&T> {
        self.editing.as_ref().or(self.saved.as_ref())
    }

    pub fn saved(&self) -> Option<&T> {
        self.saved.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.saved.is_some() || self.editing.is_some()
    }
}

/// Result of fetching all five artifacts for one rule.
///
/// Tagged with the rule id so a response that arrives after the user has
/// moved to another rule can be recognised and dropped.
#[derive(Debug)]
pub struct LoadOutcome {
    pub dtl_id: String,
    pub ontology: Result<Option<OntologyPayload>, String>,
    pub interface: Result<Option<InterfaceSpec>, String>,
    pub configuration: Result<Option<ConfigurationPayload>, String>,
    pub tests: Result<Vec<TestCase>, String>,
    pub logic: Result<Option<LogicPayload>, String>,
}

/// Fetch all five artifacts concurrently. Individual failures are carried
/// per kind; one failing fetch never blocks the others.
pub async fn fetch_artifacts(
    backend: &dyn DtlBackend,
    dtlib_id: &str,
    dtl_id: &str,
) -> LoadOutcome {
    let (ontology, interface, configuration, tests, logic) = tokio::join!(
        backend.get_ontology(dtlib_id, dtl_id),
        backend.get_interface(dtlib_id, dtl_id),
        backend.get_configuration(dtlib_id, dtl_id),
        backend.list_tests(dtlib_id, dtl_id),
        backend.get_logic(dtlib_id, dtl_id),
    );
    LoadOutcome {
        dtl_id: dtl_id.to_string(),
        ontology: ontology.map_err(|e| e.to_string()),
        interface: interface.map_err(|e| e.to_string()),
        configuration: configuration.map_err(|e| e.to_string()),
        tests: tests.map_err(|e| e.to_string()),
        logic: logic.map_err(|e| e.to_string()),
    }
}

/// Cache of one rule's five artifacts, reconciled from the backend.
#[derive(Debug)]
pub struct ArtifactStore {
    dtlib_id: String,
    dtl_id: String,
    pub ontology: Slot<OntologyPayload>,
    pub interface: Slot<InterfaceSpec>,
    pub configuration: Slot<ConfigurationPayload>,
    pub tests: Slot<Vec<TestCase>>,
    pub logic: Slot<LogicPayload>,
}

impl ArtifactStore {
    pub fn new(dtlib_id: impl Into<String>, dtl_id: impl Into<String>) -> Self {
        Self {
            dtlib_id: dtlib_id.into(),
            dtl_id: dtl_id.into(),
            ontology: Slot::new(),
            interface: Slot::new(),
            configuration: Slot::new(),
            tests: Slot::new(),
            logic: Slot::new(),
        }
    }

    pub fn dtlib_id(&self) -> &str {
        &self.dtlib_id
    }

    pub fn dtl_id(&self) -> &str {
        &self.dtl_id
    }

    /// Fetch and apply all five artifacts.
    ///
    /// Partial failure is tolerated: every kind that loaded is applied,
    /// and the failures come back as one aggregate error.
    pub async fn load(&mut self, backend: &dyn DtlBackend) -> Result<(), WorkflowError> {
        let outcome = fetch_artifacts(backend, &self.dtlib_id, &self.dtl_id).await;
        self.apply_load(outcome)
    }

    /// Apply a load outcome, guarded against stale responses: an outcome
    /// tagged with a different rule id is dropped without touching state.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> Result<(), WorkflowError> {
        if outcome.dtl_id != self.dtl_id {
            warn!(
                expected = %self.dtl_id,
                got = %outcome.dtl_id,
                "dropping stale artifact load for another rule"
            );
            return Ok(());
        }

        let mut failures = Vec::new();
        match outcome.ontology {
            Ok(Some(payload)) => self.ontology.hydrate(payload),
            Ok(None) => {}
            Err(msg) => failures.push((ArtifactKind::Ontology, msg)),
        }
        match outcome.interface {
            Ok(Some(spec)) => self.interface.hydrate(spec),
            Ok(None) => {}
            Err(msg) => failures.push((ArtifactKind::Interface, msg)),
        }
        match outcome.configuration {
            Ok(Some(payload)) => self.configuration.hydrate(payload),
            Ok(None) => {}
            Err(msg) => failures.push((ArtifactKind::Configuration, msg)),
        }
        match outcome.tests {
            Ok(cases) if !cases.is_empty() => self.tests.hydrate(cases),
            Ok(_) => {}
            Err(msg) => failures.push((ArtifactKind::Tests, msg)),
        }
        match outcome.logic {
            Ok(Some(payload)) => self.logic.hydrate(payload),
            Ok(None) => {}
            Err(msg) => failures.push((ArtifactKind::Logic, msg)),
        }

        if failures.is_empty() {
            Ok(())
        } else {
            for (kind, msg) in &failures {
                warn!(kind = %kind, error = %msg, "artifact load failed");
            }
            Err(WorkflowError::PartialLoad { failures })
        }
    }

    /// Replace all five artifacts from a bulk generation bundle.
    pub fn apply_bundle(&mut self, bundle: &GenerationBundle) {
        self.ontology.hydrate(bundle.ontology.clone());
        self.interface.hydrate(bundle.interface.clone());
        self.configuration.hydrate(bundle.configuration.clone());
        self.tests.hydrate(bundle.tests.clone());
        self.logic.hydrate(bundle.logic.clone());
    }

    // ── Saves: server value is canonical post-write ──

    pub async fn save_ontology(
        &mut self,
        backend: &dyn DtlBackend,
        payload: OntologyPayload,
    ) -> Result<(), WorkflowError> {
        let canonical = backend
            .save_ontology(&self.dtlib_id, &self.dtl_id, &payload)
            .await?;
        self.ontology.commit(canonical);
        Ok(())
    }

    pub async fn save_interface(
        &mut self,
        backend: &dyn DtlBackend,
        spec: InterfaceSpec,
    ) -> Result<(), WorkflowError> {
        let canonical = backend
            .save_interface(&self.dtlib_id, &self.dtl_id, &spec)
            .await?;
        self.interface.commit(canonical);
        Ok(())
    }

    pub async fn save_configuration(
        &mut self,
        backend: &dyn DtlBackend,
        payload: ConfigurationPayload,
    ) -> Result<(), WorkflowError> {
        let canonical = backend
            .save_configuration(&self.dtlib_id, &self.dtl_id, &payload)
            .await?;
        self.configuration.commit(canonical);
        Ok(())
    }

    pub async fn save_logic(
        &mut self,
        backend: &dyn DtlBackend,
        payload: LogicPayload,
    ) -> Result<(), WorkflowError> {
        let canonical = backend
            .save_logic(&self.dtlib_id, &self.dtl_id, &payload)
            .await?;
        self.logic.commit(canonical);
        Ok(())
    }

    // ── Test-case operations keep the slot in step with the backend ──

    pub async fn create_test(
        &mut self,
        backend: &dyn DtlBackend,
        new: NewTestCase,
    ) -> Result<TestCase, WorkflowError> {
        let created = backend.create_test(&self.dtlib_id, &self.dtl_id, &new).await?;
        let mut cases = self.tests.current().cloned().unwrap_or_default();
        cases.push(created.clone());
        self.tests.commit(cases);
        Ok(created)
    }

    pub async fn update_test(
        &mut self,
        backend: &dyn DtlBackend,
        test_id: &str,
        patch: TestCasePatch,
    ) -> Result<TestCase, WorkflowError> {
        let updated = backend
            .update_test(&self.dtlib_id, &self.dtl_id, test_id, &patch)
            .await?;
        let mut cases = self.tests.current().cloned().unwrap_or_default();
        for case in cases.iter_mut() {
            if case.id == test_id {
                *case = updated.clone();
            }
        }
        self.tests.commit(cases);
        Ok(updated)
    }

    pub async fn delete_test(
        &mut self,
        backend: &dyn DtlBackend,
        test_id: &str,
    ) -> Result<(), WorkflowError> {
        backend.delete_test(&self.dtlib_id, &self.dtl_id, test_id).await?;
        let mut cases = self.tests.current().cloned().unwrap_or_default();
        cases.retain(|case| case.id != test_id);
        self.tests.commit(cases);
        Ok(())
    }

    pub async fn run_tests(
        &mut self,
        backend: &dyn DtlBackend,
    ) -> Result<Vec<TestCase>, WorkflowError> {
        let report = backend.run_tests(&self.dtlib_id, &self.dtl_id).await?;
        self.tests.commit(report.results.clone());
        Ok(report.results)
    }

    // ── Presence predicates ──

    pub fn has(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Ontology => self
                .ontology
                .current()
                .is_some_and(|p| !p.ontology_owl.trim().is_empty()),
            ArtifactKind::Interface => self.interface.is_populated(),
            ArtifactKind::Configuration => self
                .configuration
                .current()
                .is_some_and(|p| !p.configuration_owl.trim().is_empty()),
            ArtifactKind::Tests => self.tests.current().is_some_and(|c| !c.is_empty()),
            ArtifactKind::Logic => self
                .logic
                .current()
                .is_some_and(|p| !p.code.trim().is_empty()),
        }
    }

    pub fn completion(&self) -> Completion {
        Completion::from_artifacts(
            self.has(ArtifactKind::Ontology),
            self.has(ArtifactKind::Interface),
            self.has(ArtifactKind::Configuration),
            self.has(ArtifactKind::Tests),
            self.has(ArtifactKind::Logic),
        )
    }
}

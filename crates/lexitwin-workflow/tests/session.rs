//! End-to-end session behaviour against an in-memory backend fake.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexitwin_client::{ApiError, DtlBackend};
use lexitwin_core::model::{
    ConfigurationPayload, Dtl, GenerationBundle, InterfaceSpec, LogicPayload, NewComment,
    NewTestCase, OntologyPayload, ReviewComment, ReviewStatus, TestCase, TestCasePatch,
    TestResult, TestRunReport,
};
use lexitwin_core::wire::DtlPatch;
use lexitwin_core::ArtifactKind;
use lexitwin_workflow::{AuditCache, MemoryAuditCache, Session, WorkflowError};

#[derive(Default)]
struct MockState {
    ontology: Option<OntologyPayload>,
    interface: Option<InterfaceSpec>,
    configuration: Option<ConfigurationPayload>,
    tests: Vec<TestCase>,
    logic: Option<LogicPayload>,
    dtl: Option<Dtl>,
    comments: Vec<ReviewComment>,
    patches: Vec<DtlPatch>,
    fail_get: HashSet<ArtifactKind>,
    fail_generate_all: bool,
    normalize_saves: bool,
    bundle: Option<GenerationBundle>,
    gen_ontology: Option<OntologyPayload>,
    next_test_id: u32,
}

#[derive(Clone)]
struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    fn new(state: Arc<Mutex<MockState>>) -> Self {
        Self { state }
    }

    fn server_error(detail: &str) -> ApiError {
        ApiError::Server {
            status: 500,
            body: detail.to_string(),
        }
    }
}

#[async_trait]
impl DtlBackend for MockBackend {
    async fn get_ontology(&self, _: &str, _: &str) -> Result<Option<OntologyPayload>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_get.contains(&ArtifactKind::Ontology) {
            return Err(Self::server_error("ontology unavailable"));
        }
        Ok(state.ontology.clone())
    }

    async fn save_ontology(
        &self,
        _: &str,
        _: &str,
        payload: &OntologyPayload,
    ) -> Result<OntologyPayload, ApiError> {
        let mut state = self.state.lock().unwrap();
        let mut canonical = payload.clone();
        if state.normalize_saves {
            canonical.ontology_owl = format!("{}-normalized", canonical.ontology_owl);
        }
        state.ontology = Some(canonical.clone());
        Ok(canonical)
    }

    async fn generate_ontology(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Option<OntologyPayload>, ApiError> {
        Ok(self.state.lock().unwrap().gen_ontology.clone())
    }

    async fn get_interface(&self, _: &str, _: &str) -> Result<Option<InterfaceSpec>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_get.contains(&ArtifactKind::Interface) {
            return Err(Self::server_error("interface unavailable"));
        }
        Ok(state.interface.clone())
    }

    async fn save_interface(
        &self,
        _: &str,
        _: &str,
        spec: &InterfaceSpec,
    ) -> Result<InterfaceSpec, ApiError> {
        self.state.lock().unwrap().interface = Some(spec.clone());
        Ok(spec.clone())
    }

    async fn generate_interface(&self, _: &str, _: &str) -> Result<Option<InterfaceSpec>, ApiError> {
        Ok(None)
    }

    async fn get_configuration(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_get.contains(&ArtifactKind::Configuration) {
            return Err(Self::server_error("configuration unavailable"));
        }
        Ok(state.configuration.clone())
    }

    async fn save_configuration(
        &self,
        _: &str,
        _: &str,
        payload: &ConfigurationPayload,
    ) -> Result<ConfigurationPayload, ApiError> {
        self.state.lock().unwrap().configuration = Some(payload.clone());
        Ok(payload.clone())
    }

    async fn generate_configuration(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError> {
        Ok(None)
    }

    async fn list_tests(&self, _: &str, _: &str) -> Result<Vec<TestCase>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_get.contains(&ArtifactKind::Tests) {
            return Err(Self::server_error("tests unavailable"));
        }
        Ok(state.tests.clone())
    }

    async fn create_test(
        &self,
        _: &str,
        _: &str,
        new: &NewTestCase,
    ) -> Result<TestCase, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.next_test_id += 1;
        let case = TestCase {
            id: format!("t-{}", state.next_test_id),
            name: new.name.clone(),
            description: new.description.clone(),
            input: new.input.clone(),
            expected_output: new.expected_output.clone(),
            actual_output: None,
            last_run: None,
            last_result: None,
        };
        state.tests.push(case.clone());
        Ok(case)
    }

    async fn update_test(
        &self,
        _: &str,
        _: &str,
        test_id: &str,
        patch: &TestCasePatch,
    ) -> Result<TestCase, ApiError> {
        let mut state = self.state.lock().unwrap();
        let case = state
            .tests
            .iter_mut()
            .find(|c| c.id == test_id)
            .ok_or_else(|| ApiError::Server {
                status: 404,
                body: "no such test".into(),
            })?;
        if let Some(name) = &patch.name {
            case.name = name.clone();
        }
        if let Some(description) = &patch.description {
            case.description = Some(description.clone());
        }
        if let Some(input) = &patch.input {
            case.input = input.clone();
        }
        if let Some(expected) = &patch.expected_output {
            case.expected_output = expected.clone();
        }
        Ok(case.clone())
    }

    async fn delete_test(&self, _: &str, _: &str, test_id: &str) -> Result<(), ApiError> {
        self.state.lock().unwrap().tests.retain(|c| c.id != test_id);
        Ok(())
    }

    async fn run_tests(&self, _: &str, _: &str) -> Result<TestRunReport, ApiError> {
        let mut state = self.state.lock().unwrap();
        for case in state.tests.iter_mut() {
            case.actual_output = Some(case.expected_output.clone());
            case.last_result = Some(TestResult::Passed);
            case.last_run = Some("2026-08-25T12:00:00Z".into());
        }
        Ok(TestRunReport {
            results: state.tests.clone(),
        })
    }

    async fn generate_tests(&self, _: &str, _: &str) -> Result<Option<Vec<TestCase>>, ApiError> {
        Ok(None)
    }

    async fn get_logic(&self, _: &str, _: &str) -> Result<Option<LogicPayload>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_get.contains(&ArtifactKind::Logic) {
            return Err(Self::server_error("logic unavailable"));
        }
        Ok(state.logic.clone())
    }

    async fn save_logic(
        &self,
        _: &str,
        _: &str,
        payload: &LogicPayload,
    ) -> Result<LogicPayload, ApiError> {
        self.state.lock().unwrap().logic = Some(payload.clone());
        Ok(payload.clone())
    }

    async fn generate_logic(&self, _: &str, _: &str) -> Result<Option<LogicPayload>, ApiError> {
        Ok(None)
    }

    async fn generate_all(&self, _: &str, _: &str) -> Result<GenerationBundle, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_generate_all {
            return Err(Self::server_error("draft service overloaded"));
        }
        Ok(state.bundle.clone().expect("bundle not configured"))
    }

    async fn update_dtl(&self, _: &str, _: &str, patch: &DtlPatch) -> Result<Dtl, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.patches.push(patch.clone());
        let mut dtl = state.dtl.clone().expect("dtl not configured");
        if let Some(status) = patch.review_status {
            dtl.review_status = status;
        }
        if let Some(name) = &patch.name {
            dtl.name = name.clone();
        }
        state.dtl = Some(dtl.clone());
        Ok(dtl)
    }

    async fn add_comment(
        &self,
        _: &str,
        _: &str,
        new: &NewComment,
    ) -> Result<ReviewComment, ApiError> {
        let mut state = self.state.lock().unwrap();
        let comment = ReviewComment {
            id: format!("c-{}", state.comments.len() + 1),
            author: "reviewer".into(),
            role: "Reviewer".into(),
            comment: new.comment.clone(),
            timestamp: "2026-08-25T12:00:00Z".into(),
            kind: new.kind.clone(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }
}

// ── Fixtures ──

fn sample_dtl() -> Dtl {
    Dtl {
        id: "dtl-1".into(),
        dtlib_id: "lib-1".into(),
        name: "Minimum age requirement".into(),
        description: "Applicant must be of statutory age".into(),
        owner: Some(7),
        version: "1.0".into(),
        legal_text: "A person qualifies if they have attained the age of 18.".into(),
        legal_reference: "s.3(1)".into(),
        authoritative_url: String::new(),
        category: "Eligibility".into(),
        tags: vec!["age".into()],
        review_status: ReviewStatus::Pending,
        review_comments: String::new(),
    }
}

fn ontology(owl: &str) -> OntologyPayload {
    OntologyPayload {
        ontology_owl: owl.into(),
        raw_response: None,
    }
}

fn logic(code: &str) -> LogicPayload {
    LogicPayload {
        language: "Python".into(),
        code: code.into(),
    }
}

fn interface(name: &str) -> InterfaceSpec {
    InterfaceSpec {
        function_name: name.into(),
        inputs: vec![],
        outputs: vec![],
        mcp_spec: None,
    }
}

fn configuration(owl: &str) -> ConfigurationPayload {
    ConfigurationPayload {
        configuration_owl: owl.into(),
        raw_response: None,
    }
}

fn test_case(id: &str) -> TestCase {
    TestCase {
        id: id.into(),
        name: format!("case {id}"),
        description: None,
        input: serde_json::json!({"age": 20}),
        expected_output: serde_json::json!({"eligible": true}),
        actual_output: None,
        last_run: None,
        last_result: None,
    }
}

fn bundle() -> GenerationBundle {
    GenerationBundle {
        ontology: ontology("Class: Claimant"),
        ontology_raw: "raw-ontology".into(),
        interface: interface("check_eligibility"),
        interface_raw: "raw-interface".into(),
        configuration: configuration("Param: minimum_age = 18"),
        configuration_raw: "raw-configuration".into(),
        tests: vec![test_case("t-1")],
        tests_raw: "raw-tests".into(),
        logic: logic("def check_eligibility(age): return age >= 18"),
        logic_raw: "raw-logic".into(),
    }
}

fn open_session(
    state: Arc<Mutex<MockState>>,
    audit: Arc<MemoryAuditCache>,
) -> Session<MockBackend, Arc<MemoryAuditCache>> {
    state.lock().unwrap().dtl = Some(sample_dtl());
    let backend = MockBackend::new(state);
    Session::open(backend, audit, "lib-1".into(), sample_dtl()).unwrap()
}

// ── Loading ──

#[tokio::test]
async fn load_populates_present_artifacts() {
    let state = Arc::new(Mutex::new(MockState::default()));
    {
        let mut s = state.lock().unwrap();
        s.ontology = Some(ontology("Class: Person"));
        s.tests = vec![test_case("t-1")];
        s.logic = Some(logic("def f(): ..."));
    }
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));
    session.load().await.unwrap();
    assert!(session.store().has(ArtifactKind::Ontology));
    assert!(!session.store().has(ArtifactKind::Interface));
    assert!(session.store().has(ArtifactKind::Tests));
    assert!(session.store().has(ArtifactKind::Logic));
    assert_eq!(session.completion().ratio(), 67);
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn load_with_one_failure_keeps_the_other_four() {
    let state = Arc::new(Mutex::new(MockState::default()));
    {
        let mut s = state.lock().unwrap();
        s.ontology = Some(ontology("Class: Person"));
        s.interface = Some(interface("check"));
        s.tests = vec![test_case("t-1")];
        s.logic = Some(logic("def f(): ..."));
        s.fail_get.insert(ArtifactKind::Configuration);
    }
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));
    let err = session.load().await.unwrap_err();
    match &err {
        WorkflowError::PartialLoad { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, ArtifactKind::Configuration);
        }
        other => panic!("expected PartialLoad, got {other:?}"),
    }
    assert!(session.store().has(ArtifactKind::Ontology));
    assert!(session.store().has(ArtifactKind::Interface));
    assert!(session.store().has(ArtifactKind::Tests));
    assert!(session.store().has(ArtifactKind::Logic));
    assert!(!session.store().has(ArtifactKind::Configuration));
    // One aggregate message surfaced to the UI.
    assert!(session.last_error().unwrap().contains("configuration"));
}

#[tokio::test]
async fn load_preserves_cached_raw_responses() {
    let audit = Arc::new(MemoryAuditCache::new());
    let mut seeded = std::collections::HashMap::new();
    seeded.insert(ArtifactKind::Ontology, "cached raw output".to_string());
    audit.store("dtl-1", &seeded).unwrap();

    let state = Arc::new(Mutex::new(MockState::default()));
    state.lock().unwrap().ontology = Some(OntologyPayload {
        ontology_owl: "fresh blob".into(),
        raw_response: Some("fresh raw".into()),
    });
    let mut session = open_session(state, audit.clone());
    session.load().await.unwrap();
    // Existing audit entry wins over the fill-if-absent path.
    assert_eq!(
        session.raw_response(ArtifactKind::Ontology),
        Some("cached raw output")
    );
    assert_eq!(
        audit.load("dtl-1").unwrap().get(&ArtifactKind::Ontology).map(String::as_str),
        Some("cached raw output")
    );
}

// ── Audit cache failure ──

struct FailingAuditCache;

impl AuditCache for FailingAuditCache {
    fn load(&self, _: &str) -> Result<HashMap<ArtifactKind, String>, std::io::Error> {
        Ok(HashMap::new())
    }

    fn store(&self, _: &str, _: &HashMap<ArtifactKind, String>) -> Result<(), std::io::Error> {
        Err(std::io::Error::other("disk full"))
    }
}

#[tokio::test]
async fn audit_write_failure_on_load_clears_loading_and_keeps_artifacts() {
    let state = Arc::new(Mutex::new(MockState::default()));
    {
        let mut s = state.lock().unwrap();
        s.ontology = Some(ontology("Class: Person"));
        s.dtl = Some(sample_dtl());
    }
    let backend = MockBackend::new(state);
    let mut session =
        Session::open(backend, FailingAuditCache, "lib-1".into(), sample_dtl()).unwrap();

    let err = session.load().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Audit(_)));
    // The flag and the loaded artifacts must survive the audit failure.
    assert!(!session.is_loading());
    assert!(session.store().has(ArtifactKind::Ontology));
    assert!(session.last_error().unwrap().contains("disk full"));
}

#[tokio::test]
async fn audit_write_failure_on_generate_is_recorded() {
    let state = Arc::new(Mutex::new(MockState::default()));
    {
        let mut s = state.lock().unwrap();
        s.gen_ontology = Some(ontology("Class: Claimant"));
        s.dtl = Some(sample_dtl());
    }
    let backend = MockBackend::new(state);
    let mut session =
        Session::open(backend, FailingAuditCache, "lib-1".into(), sample_dtl()).unwrap();

    let err = session.generate(ArtifactKind::Ontology).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Audit(_)));
    assert!(session.last_error().unwrap().contains("disk full"));
    assert!(!session.is_generating(ArtifactKind::Ontology));
}

// ── Save reconciliation ──

#[tokio::test]
async fn save_adopts_server_canonical_value_and_cancel_reverts_to_it() {
    let state = Arc::new(Mutex::new(MockState::default()));
    state.lock().unwrap().normalize_saves = true;
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));

    session.edit_ontology("draft-v2".into());
    session.save_ontology("draft-v2".into()).await.unwrap();
    assert_eq!(
        session.store().ontology.current().unwrap().ontology_owl,
        "draft-v2-normalized"
    );
    assert_eq!(
        session.store().ontology.saved().unwrap().ontology_owl,
        "draft-v2-normalized"
    );

    session.edit_ontology("scratch".into());
    session.cancel_edit(ArtifactKind::Ontology);
    assert_eq!(
        session.store().ontology.current().unwrap().ontology_owl,
        "draft-v2-normalized"
    );
}

// ── Generation ──

#[tokio::test]
async fn generate_one_updates_slot_and_audit() {
    let audit = Arc::new(MemoryAuditCache::new());
    let state = Arc::new(Mutex::new(MockState::default()));
    state.lock().unwrap().gen_ontology = Some(OntologyPayload {
        ontology_owl: "Class: Claimant".into(),
        raw_response: Some("model said: Class: Claimant".into()),
    });
    let mut session = open_session(state, audit.clone());
    session.generate(ArtifactKind::Ontology).await.unwrap();
    assert!(session.store().has(ArtifactKind::Ontology));
    assert_eq!(
        session.raw_response(ArtifactKind::Ontology),
        Some("model said: Class: Claimant")
    );
    // Durable slot was written through.
    assert!(audit.load("dtl-1").unwrap().contains_key(&ArtifactKind::Ontology));
}

#[tokio::test]
async fn generate_no_content_leaves_state_untouched() {
    let state = Arc::new(Mutex::new(MockState::default()));
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));
    session.generate(ArtifactKind::Logic).await.unwrap();
    assert!(!session.store().has(ArtifactKind::Logic));
    assert!(session.raw_response(ArtifactKind::Logic).is_none());
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn generate_all_replaces_all_five_artifacts_and_audit_entries() {
    let audit = Arc::new(MemoryAuditCache::new());
    let state = Arc::new(Mutex::new(MockState::default()));
    state.lock().unwrap().bundle = Some(bundle());
    let mut session = open_session(state, audit.clone());
    session.generate_all().await.unwrap();
    for kind in ArtifactKind::ALL {
        assert!(session.store().has(kind), "{kind} missing after bulk");
    }
    assert_eq!(session.raw_response(ArtifactKind::Ontology), Some("raw-ontology"));
    assert_eq!(session.raw_response(ArtifactKind::Logic), Some("raw-logic"));
    assert_eq!(session.completion().ratio(), 100);
    assert_eq!(audit.load("dtl-1").unwrap().len(), 5);
}

#[tokio::test]
async fn failed_generate_all_changes_nothing() {
    let state = Arc::new(Mutex::new(MockState::default()));
    {
        let mut s = state.lock().unwrap();
        s.ontology = Some(ontology("existing ontology"));
        s.logic = Some(logic("existing code"));
        s.fail_generate_all = true;
    }
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));
    session.load().await.unwrap();
    let ontology_before = session.store().ontology.current().cloned();
    let logic_before = session.store().logic.current().cloned();
    let ratio_before = session.completion().ratio();

    let err = session.generate_all().await.unwrap_err();
    assert!(err.to_string().contains("draft service overloaded"));

    assert_eq!(session.store().ontology.current().cloned(), ontology_before);
    assert_eq!(session.store().logic.current().cloned(), logic_before);
    assert!(!session.store().has(ArtifactKind::Interface));
    assert!(!session.store().has(ArtifactKind::Configuration));
    assert!(!session.store().has(ArtifactKind::Tests));
    assert_eq!(session.completion().ratio(), ratio_before);
}

// ── Test cases ──

#[tokio::test]
async fn test_case_lifecycle() {
    let state = Arc::new(Mutex::new(MockState::default()));
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));

    let created = session
        .add_test(NewTestCase {
            name: "under age".into(),
            input: serde_json::json!({"age": 17}),
            expected_output: serde_json::json!({"eligible": false}),
            description: None,
        })
        .await
        .unwrap();
    assert!(session.store().has(ArtifactKind::Tests));

    let updated = session
        .update_test(
            &created.id,
            TestCasePatch {
                name: Some("under statutory age".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "under statutory age");

    let results = session.run_tests().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].last_result, Some(TestResult::Passed));
    assert_eq!(results[0].actual_output, Some(serde_json::json!({"eligible": false})));

    session.remove_test(&created.id).await.unwrap();
    assert!(!session.store().has(ArtifactKind::Tests));
}

// ── Review ──

#[tokio::test]
async fn approve_without_comment_clears_review_comments() {
    let state = Arc::new(Mutex::new(MockState::default()));
    let mut session = open_session(state.clone(), Arc::new(MemoryAuditCache::new()));
    assert_eq!(session.dtl().review_status, ReviewStatus::Pending);

    session.approve(None).await.unwrap();
    assert_eq!(session.dtl().review_status, ReviewStatus::Approved);
    assert_eq!(session.dtl().review_comments, "");

    // Exactly one patch was sent, touching only the status.
    let s = state.lock().unwrap();
    assert_eq!(s.patches.len(), 1);
    let patch = &s.patches[0];
    assert_eq!(patch.review_status, Some(ReviewStatus::Approved));
    assert!(patch.name.is_none());
    assert!(patch.tags.is_none());
    assert!(s.comments.is_empty());
}

#[tokio::test]
async fn approve_below_full_completion_is_allowed() {
    let state = Arc::new(Mutex::new(MockState::default()));
    let mut session = open_session(state, Arc::new(MemoryAuditCache::new()));
    assert!(session.completion().ratio() < 100);
    session.approve(Some("good enough for now")).await.unwrap();
    assert_eq!(session.dtl().review_status, ReviewStatus::Approved);
}

#[tokio::test]
async fn request_revision_persists_status_and_comment() {
    let state = Arc::new(Mutex::new(MockState::default()));
    let mut session = open_session(state.clone(), Arc::new(MemoryAuditCache::new()));

    session.request_revision("needs more detail").await.unwrap();
    assert_eq!(session.dtl().review_status, ReviewStatus::RevisionRequested);
    assert_eq!(session.dtl().review_comments, "needs more detail");

    let s = state.lock().unwrap();
    assert_eq!(s.dtl.as_ref().unwrap().review_status, ReviewStatus::RevisionRequested);
    assert_eq!(s.comments.len(), 1);
    assert_eq!(s.comments[0].comment, "needs more detail");
    assert_eq!(s.comments[0].kind.as_deref(), Some("revision"));
}

#[tokio::test]
async fn request_revision_without_comment_is_rejected_before_any_call() {
    let state = Arc::new(Mutex::new(MockState::default()));
    let mut session = open_session(state.clone(), Arc::new(MemoryAuditCache::new()));

    let err = session.request_revision("   ").await.unwrap_err();
    assert!(matches!(err, WorkflowError::MissingComment));
    assert_eq!(session.dtl().review_status, ReviewStatus::Pending);
    let s = state.lock().unwrap();
    assert!(s.patches.is_empty());
    assert!(s.comments.is_empty());
}

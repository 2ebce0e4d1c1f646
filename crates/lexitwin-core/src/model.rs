//! Domain model for digital twins of legislation.
//!
//! A `DtLib` holds one statute; each of its `Dtl`s is one segmented legal
//! rule with an independent artifact pipeline (ontology, interface,
//! configuration, tests, logic). Artifact payloads are shared between the
//! wire and the domain unchanged; the library/rule entities themselves go
//! through the translation layer in [`crate::wire`].

use serde::{Deserialize, Serialize};

/// Lifecycle status of a statute library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibStatus {
    Draft,
    InProgress,
    Review,
    Approved,
}

impl LibStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Approved => "approved",
        }
    }

    /// Map a backend status string to the closest domain value.
    ///
    /// Case-insensitive, tolerates legacy spellings (`in_progress`,
    /// `in progress`). Unknown or absent values fail open to `Draft`.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("in-progress") | Some("in_progress") | Some("in progress") => Self::InProgress,
            Some("review") => Self::Review,
            Some("approved") => Self::Approved,
            _ => Self::Draft,
        }
    }
}

/// Review status of a single legal rule.
///
/// Transitions happen only through the review aggregator's approve and
/// request-revision operations, never by direct field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    RevisionRequested,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::RevisionRequested => "revision-requested",
        }
    }

    /// Map a backend status string to the closest domain value.
    ///
    /// Unknown or absent values fail open to `Pending`.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("approved") => Self::Approved,
            Some("revision-requested") | Some("revision_requested") => Self::RevisionRequested,
            _ => Self::Pending,
        }
    }
}

/// The five independently authored artifact kinds of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Ontology,
    Interface,
    Configuration,
    Tests,
    Logic,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        Self::Ontology,
        Self::Interface,
        Self::Configuration,
        Self::Tests,
        Self::Logic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ontology => "ontology",
            Self::Interface => "interface",
            Self::Configuration => "configuration",
            Self::Tests => "tests",
            Self::Logic => "logic",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statute: container for metadata, full text, and segmented rules.
#[derive(Debug, Clone, PartialEq)]
pub struct DtLib {
    pub id: String,
    pub name: String,
    pub law_identifier: String,
    pub jurisdiction: String,
    pub version: String,
    pub status: LibStatus,
    pub effective_date: String,
    pub law_text: String,
    pub authoritative_url: String,
    pub description: String,
}

/// One segmented legal rule within a statute library.
#[derive(Debug, Clone, PartialEq)]
pub struct Dtl {
    pub id: String,
    /// Owning library; immutable after creation.
    pub dtlib_id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<i64>,
    pub version: String,
    pub legal_text: String,
    pub legal_reference: String,
    pub authoritative_url: String,
    /// Free-text classification: Eligibility, Calculation, Process,
    /// Definition, or Validation.
    pub category: String,
    /// Unique, first-occurrence order preserved.
    pub tags: Vec<String>,
    pub review_status: ReviewStatus,
    pub review_comments: String,
}

/// Semantic model artifact: an opaque OWL blob plus the raw generation
/// response kept for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyPayload {
    pub ontology_owl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// One input or output of a rule's callable interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Callable interface artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    pub function_name: String,
    pub inputs: Vec<IoField>,
    pub outputs: Vec<IoField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_spec: Option<serde_json::Value>,
}

/// Extracted-parameters artifact: an opaque OWL blob like the ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationPayload {
    pub configuration_owl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Outcome of the most recent run of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    Passed,
    Failed,
    Pending,
}

/// One test case of a rule's tests artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input: serde_json::Value,
    pub expected_output: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<TestResult>,
}

/// Payload for creating a test case.
#[derive(Debug, Clone, Serialize)]
pub struct NewTestCase {
    pub name: String,
    pub input: serde_json::Value,
    pub expected_output: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for a test case; only present keys are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestCasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<serde_json::Value>,
}

/// Response of a test run: every case with `actual_output` filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRunReport {
    pub results: Vec<TestCase>,
}

/// Deterministic executable logic artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicPayload {
    pub language: String,
    pub code: String,
}

/// The generate-all response: all five artifacts plus their raw textual
/// generation responses, produced atomically by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationBundle {
    pub ontology: OntologyPayload,
    pub ontology_raw: String,
    pub interface: InterfaceSpec,
    pub interface_raw: String,
    pub configuration: ConfigurationPayload,
    pub configuration_raw: String,
    pub tests: Vec<TestCase>,
    pub tests_raw: String,
    pub logic: LogicPayload,
    pub logic_raw: String,
}

/// One entry of a rule's review comment log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub role: String,
    pub comment: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Payload for posting a review comment.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub comment: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One segmentation suggestion produced from a statute's full text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSuggestion {
    pub suggestion_id: String,
    pub title: String,
    pub description: String,
    pub legal_text: String,
    pub legal_reference: String,
}

//! HTTP client for the digital-twin REST backend.
//!
//! One method per backend operation, all under `{base}/api`. Artifact
//! reads distinguish "no content" (204 or empty body → `None`) from
//! transport and server errors; nothing is retried automatically.

use lexitwin_core::model::{
    ConfigurationPayload, Dtl, DtLib, GenerationBundle, InterfaceSpec, LogicPayload, NewComment,
    NewTestCase, OntologyPayload, ReviewComment, ReviewStatus, SegmentSuggestion, TestCase,
    TestCasePatch, TestRunReport,
};
use lexitwin_core::wire::{DtLibPatch, DtLibWire, DtlPatch, DtlWire, NewDtl, NewDtLib};
use lexitwin_core::LibStatus;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Filters for listing statute libraries.
#[derive(Debug, Clone, Default)]
pub struct DtLibQuery {
    pub search: Option<String>,
    pub jurisdiction: Option<String>,
    pub status: Option<LibStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DtLibQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(jurisdiction) = &self.jurisdiction {
            params.push(("jurisdiction", jurisdiction.clone()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}

/// Filters for listing rules within a library.
#[derive(Debug, Clone, Default)]
pub struct DtlQuery {
    pub search: Option<String>,
    pub status: Option<ReviewStatus>,
    pub owner: Option<i64>,
}

impl DtlQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(owner) = self.owner {
            params.push(("owner", owner.to_string()));
        }
        params
    }
}

/// Confirmation of an approve or request-revision call.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewAck {
    pub status: String,
    #[serde(default)]
    pub approved_at: Option<String>,
}

/// REST client for the backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn dtlib_url(&self, tail: &str) -> String {
        format!("{}/api/dtlibs{tail}", self.base_url)
    }

    fn dtl_url(&self, dtlib_id: &str, dtl_id: &str, tail: &str) -> String {
        format!(
            "{}/api/dtlibs/{dtlib_id}/dtls/{dtl_id}{tail}",
            self.base_url
        )
    }

    // ── Statute libraries ──

    pub async fn list_dtlibs(&self, query: &DtLibQuery) -> Result<Vec<DtLib>, ApiError> {
        let url = self.dtlib_url("");
        let resp = self.client.get(&url).query(&query.params()).send().await?;
        let wires: Vec<DtLibWire> = read_json(resp).await?;
        Ok(wires.into_iter().map(DtLib::from_wire).collect())
    }

    pub async fn create_dtlib(&self, new: &NewDtLib) -> Result<DtLib, ApiError> {
        let url = self.dtlib_url("");
        info!(url = %url, law = %new.name, "creating statute library");
        let resp = self.client.post(&url).json(&new.to_wire()).send().await?;
        Ok(DtLib::from_wire(read_json(resp).await?))
    }

    pub async fn get_dtlib(&self, dtlib_id: &str) -> Result<DtLib, ApiError> {
        let url = self.dtlib_url(&format!("/{dtlib_id}"));
        let resp = self.client.get(&url).send().await?;
        Ok(DtLib::from_wire(read_json(resp).await?))
    }

    pub async fn update_dtlib(
        &self,
        dtlib_id: &str,
        patch: &DtLibPatch,
    ) -> Result<DtLib, ApiError> {
        let url = self.dtlib_url(&format!("/{dtlib_id}"));
        info!(url = %url, "updating statute library");
        let resp = self.client.put(&url).json(&patch.to_wire()).send().await?;
        Ok(DtLib::from_wire(read_json(resp).await?))
    }

    /// Delete a library. Cascades to all of its rules on the backend.
    pub async fn delete_dtlib(&self, dtlib_id: &str) -> Result<(), ApiError> {
        let url = self.dtlib_url(&format!("/{dtlib_id}"));
        info!(url = %url, "deleting statute library");
        let resp = self.client.delete(&url).send().await?;
        read_unit(resp).await
    }

    /// Ask the backend to segment the library's full text into rule
    /// suggestions.
    pub async fn segment_dtlib(&self, dtlib_id: &str) -> Result<Vec<SegmentSuggestion>, ApiError> {
        let url = self.dtlib_url(&format!("/{dtlib_id}/segment"));
        info!(url = %url, "requesting segmentation");
        let resp = self.client.post(&url).send().await?;
        read_json(resp).await
    }

    // ── Rules ──

    pub async fn list_dtls(&self, dtlib_id: &str, query: &DtlQuery) -> Result<Vec<Dtl>, ApiError> {
        let url = self.dtlib_url(&format!("/{dtlib_id}/dtls"));
        let resp = self.client.get(&url).query(&query.params()).send().await?;
        let wires: Vec<DtlWire> = read_json(resp).await?;
        Ok(wires.into_iter().map(Dtl::from_wire).collect())
    }

    pub async fn create_dtl(&self, dtlib_id: &str, new: &NewDtl) -> Result<Dtl, ApiError> {
        let url = self.dtlib_url(&format!("/{dtlib_id}/dtls"));
        info!(url = %url, rule = %new.name, "creating rule");
        let resp = self.client.post(&url).json(&new.to_wire()).send().await?;
        Ok(Dtl::from_wire(read_json(resp).await?))
    }

    pub async fn get_dtl(&self, dtlib_id: &str, dtl_id: &str) -> Result<Dtl, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "");
        let resp = self.client.get(&url).send().await?;
        Ok(Dtl::from_wire(read_json(resp).await?))
    }

    pub async fn update_dtl(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        patch: &DtlPatch,
    ) -> Result<Dtl, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "");
        info!(url = %url, "updating rule");
        let resp = self.client.put(&url).json(&patch.to_wire()).send().await?;
        Ok(Dtl::from_wire(read_json(resp).await?))
    }

    pub async fn delete_dtl(&self, dtlib_id: &str, dtl_id: &str) -> Result<(), ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "");
        info!(url = %url, "deleting rule");
        let resp = self.client.delete(&url).send().await?;
        read_unit(resp).await
    }

    // ── Artifacts ──

    pub async fn get_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<OntologyPayload>, ApiError> {
        self.get_artifact(dtlib_id, dtl_id, "/ontology").await
    }

    pub async fn save_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &OntologyPayload,
    ) -> Result<OntologyPayload, ApiError> {
        self.put_artifact(dtlib_id, dtl_id, "/ontology", payload).await
    }

    pub async fn generate_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<OntologyPayload>, ApiError> {
        self.post_artifact(dtlib_id, dtl_id, "/ontology/generate").await
    }

    pub async fn get_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<InterfaceSpec>, ApiError> {
        self.get_artifact(dtlib_id, dtl_id, "/interface").await
    }

    pub async fn save_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &InterfaceSpec,
    ) -> Result<InterfaceSpec, ApiError> {
        self.put_artifact(dtlib_id, dtl_id, "/interface", payload).await
    }

    pub async fn generate_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<InterfaceSpec>, ApiError> {
        self.post_artifact(dtlib_id, dtl_id, "/interface/generate").await
    }

    pub async fn get_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError> {
        self.get_artifact(dtlib_id, dtl_id, "/configuration").await
    }

    pub async fn save_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &ConfigurationPayload,
    ) -> Result<ConfigurationPayload, ApiError> {
        self.put_artifact(dtlib_id, dtl_id, "/configuration", payload).await
    }

    pub async fn generate_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError> {
        self.post_artifact(dtlib_id, dtl_id, "/configuration/generate").await
    }

    pub async fn get_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<LogicPayload>, ApiError> {
        self.get_artifact(dtlib_id, dtl_id, "/logic").await
    }

    /// Save logic. The backend acknowledges with a bare timestamp, so the
    /// submitted payload is echoed back as the canonical value.
    pub async fn save_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &LogicPayload,
    ) -> Result<LogicPayload, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/logic");
        info!(url = %url, "saving logic");
        let resp = self.client.put(&url).json(payload).send().await?;
        read_unit(resp).await?;
        Ok(payload.clone())
    }

    pub async fn generate_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<LogicPayload>, ApiError> {
        self.post_artifact(dtlib_id, dtl_id, "/logic/generate").await
    }

    // ── Test cases ──

    pub async fn list_tests(&self, dtlib_id: &str, dtl_id: &str) -> Result<Vec<TestCase>, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/tests");
        let resp = self.client.get(&url).send().await?;
        read_json(resp).await
    }

    pub async fn create_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        new: &NewTestCase,
    ) -> Result<TestCase, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/tests");
        info!(url = %url, name = %new.name, "creating test case");
        let resp = self.client.post(&url).json(new).send().await?;
        read_json(resp).await
    }

    pub async fn update_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        test_id: &str,
        patch: &TestCasePatch,
    ) -> Result<TestCase, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, &format!("/tests/{test_id}"));
        info!(url = %url, "updating test case");
        let resp = self.client.put(&url).json(patch).send().await?;
        read_json(resp).await
    }

    pub async fn delete_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        test_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, &format!("/tests/{test_id}"));
        info!(url = %url, "deleting test case");
        let resp = self.client.delete(&url).send().await?;
        read_unit(resp).await
    }

    /// Execute all test cases against the rule's logic.
    pub async fn run_tests(&self, dtlib_id: &str, dtl_id: &str) -> Result<TestRunReport, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/tests/run");
        info!(url = %url, "running test cases");
        let resp = self.client.post(&url).send().await?;
        read_json(resp).await
    }

    pub async fn generate_tests(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<Vec<TestCase>>, ApiError> {
        self.post_artifact(dtlib_id, dtl_id, "/tests/generate").await
    }

    // ── Bulk generation ──

    /// Draft all five artifacts in one backend call.
    ///
    /// Atomic from the caller's perspective: on error nothing was applied.
    pub async fn generate_all(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<GenerationBundle, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/generate-all");
        info!(url = %url, "generating all artifacts");
        let resp = self.client.post(&url).send().await?;
        read_json(resp).await
    }

    // ── Review ──

    pub async fn approve(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        comment: Option<&str>,
    ) -> Result<ReviewAck, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/approve");
        info!(url = %url, "approving rule");
        let body = match comment {
            Some(comment) => serde_json::json!({ "comment": comment }),
            None => serde_json::json!({}),
        };
        let resp = self.client.post(&url).json(&body).send().await?;
        read_json(resp).await
    }

    pub async fn request_revision(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        comment: &str,
    ) -> Result<ReviewAck, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/request-revision");
        info!(url = %url, "requesting revision");
        let body = serde_json::json!({ "comment": comment });
        let resp = self.client.post(&url).json(&body).send().await?;
        read_json(resp).await
    }

    pub async fn list_comments(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Vec<ReviewComment>, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/comments");
        let resp = self.client.get(&url).send().await?;
        read_json(resp).await
    }

    pub async fn add_comment(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        new: &NewComment,
    ) -> Result<ReviewComment, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, "/comments");
        info!(url = %url, "adding review comment");
        let resp = self.client.post(&url).json(new).send().await?;
        read_json(resp).await
    }

    // ── Shared artifact plumbing ──

    async fn get_artifact<T: DeserializeOwned>(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        tail: &str,
    ) -> Result<Option<T>, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, tail);
        let resp = self.client.get(&url).send().await?;
        read_optional(resp).await
    }

    async fn put_artifact<T: DeserializeOwned + Serialize>(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        tail: &str,
        payload: &T,
    ) -> Result<T, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, tail);
        info!(url = %url, "saving artifact");
        let resp = self.client.put(&url).json(payload).send().await?;
        read_json(resp).await
    }

    async fn post_artifact<T: DeserializeOwned>(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        tail: &str,
    ) -> Result<Option<T>, ApiError> {
        let url = self.dtl_url(dtlib_id, dtl_id, tail);
        info!(url = %url, "generating artifact");
        let resp = self.client.post(&url).send().await?;
        read_optional(resp).await
    }
}

/// Decode a required JSON body; non-2xx surfaces as `Server`.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Decode an optional JSON body: 204 or an empty body means "not created
/// yet", which is `None` rather than an error.
async fn read_optional<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Option<T>, ApiError> {
    let status = resp.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}

/// Consume a body-less acknowledgement.
async fn read_unit(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

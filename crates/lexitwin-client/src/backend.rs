//! Trait boundary between the workflow session and the backend.
//!
//! Only the operations a per-rule authoring session needs appear here;
//! library-level CRUD stays on [`ApiClient`](crate::ApiClient) directly.
//! Tests substitute an in-memory fake.

use async_trait::async_trait;
use lexitwin_core::model::{
    ConfigurationPayload, Dtl, GenerationBundle, InterfaceSpec, LogicPayload, NewComment,
    NewTestCase, OntologyPayload, ReviewComment, TestCase, TestCasePatch, TestRunReport,
};
use lexitwin_core::wire::DtlPatch;

use crate::{ApiClient, ApiError};

#[async_trait]
pub trait DtlBackend: Send + Sync {
    async fn get_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<OntologyPayload>, ApiError>;
    async fn save_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &OntologyPayload,
    ) -> Result<OntologyPayload, ApiError>;
    async fn generate_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<OntologyPayload>, ApiError>;

    async fn get_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<InterfaceSpec>, ApiError>;
    async fn save_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &InterfaceSpec,
    ) -> Result<InterfaceSpec, ApiError>;
    async fn generate_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<InterfaceSpec>, ApiError>;

    async fn get_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError>;
    async fn save_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &ConfigurationPayload,
    ) -> Result<ConfigurationPayload, ApiError>;
    async fn generate_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError>;

    async fn list_tests(&self, dtlib_id: &str, dtl_id: &str) -> Result<Vec<TestCase>, ApiError>;
    async fn create_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        new: &NewTestCase,
    ) -> Result<TestCase, ApiError>;
    async fn update_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        test_id: &str,
        patch: &TestCasePatch,
    ) -> Result<TestCase, ApiError>;
    async fn delete_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        test_id: &str,
    ) -> Result<(), ApiError>;
    async fn run_tests(&self, dtlib_id: &str, dtl_id: &str) -> Result<TestRunReport, ApiError>;
    async fn generate_tests(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<Vec<TestCase>>, ApiError>;

    async fn get_logic(&self, dtlib_id: &str, dtl_id: &str)
        -> Result<Option<LogicPayload>, ApiError>;
    async fn save_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &LogicPayload,
    ) -> Result<LogicPayload, ApiError>;
    async fn generate_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<LogicPayload>, ApiError>;

    async fn generate_all(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<GenerationBundle, ApiError>;

    async fn update_dtl(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        patch: &DtlPatch,
    ) -> Result<Dtl, ApiError>;
    async fn add_comment(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        new: &NewComment,
    ) -> Result<ReviewComment, ApiError>;
}

#[async_trait]
impl DtlBackend for ApiClient {
    async fn get_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<OntologyPayload>, ApiError> {
        ApiClient::get_ontology(self, dtlib_id, dtl_id).await
    }

    async fn save_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &OntologyPayload,
    ) -> Result<OntologyPayload, ApiError> {
        ApiClient::save_ontology(self, dtlib_id, dtl_id, payload).await
    }

    async fn generate_ontology(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<OntologyPayload>, ApiError> {
        ApiClient::generate_ontology(self, dtlib_id, dtl_id).await
    }

    async fn get_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<InterfaceSpec>, ApiError> {
        ApiClient::get_interface(self, dtlib_id, dtl_id).await
    }

    async fn save_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &InterfaceSpec,
    ) -> Result<InterfaceSpec, ApiError> {
        ApiClient::save_interface(self, dtlib_id, dtl_id, payload).await
    }

    async fn generate_interface(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<InterfaceSpec>, ApiError> {
        ApiClient::generate_interface(self, dtlib_id, dtl_id).await
    }

    async fn get_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError> {
        ApiClient::get_configuration(self, dtlib_id, dtl_id).await
    }

    async fn save_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &ConfigurationPayload,
    ) -> Result<ConfigurationPayload, ApiError> {
        ApiClient::save_configuration(self, dtlib_id, dtl_id, payload).await
    }

    async fn generate_configuration(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<ConfigurationPayload>, ApiError> {
        ApiClient::generate_configuration(self, dtlib_id, dtl_id).await
    }

    async fn list_tests(&self, dtlib_id: &str, dtl_id: &str) -> Result<Vec<TestCase>, ApiError> {
        ApiClient::list_tests(self, dtlib_id, dtl_id).await
    }

    async fn create_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        new: &NewTestCase,
    ) -> Result<TestCase, ApiError> {
        ApiClient::create_test(self, dtlib_id, dtl_id, new).await
    }

    async fn update_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        test_id: &str,
        patch: &TestCasePatch,
    ) -> Result<TestCase, ApiError> {
        ApiClient::update_test(self, dtlib_id, dtl_id, test_id, patch).await
    }

    async fn delete_test(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        test_id: &str,
    ) -> Result<(), ApiError> {
        ApiClient::delete_test(self, dtlib_id, dtl_id, test_id).await
    }

    async fn run_tests(&self, dtlib_id: &str, dtl_id: &str) -> Result<TestRunReport, ApiError> {
        ApiClient::run_tests(self, dtlib_id, dtl_id).await
    }

    async fn generate_tests(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<Vec<TestCase>>, ApiError> {
        ApiClient::generate_tests(self, dtlib_id, dtl_id).await
    }

    async fn get_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<LogicPayload>, ApiError> {
        ApiClient::get_logic(self, dtlib_id, dtl_id).await
    }

    async fn save_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        payload: &LogicPayload,
    ) -> Result<LogicPayload, ApiError> {
        ApiClient::save_logic(self, dtlib_id, dtl_id, payload).await
    }

    async fn generate_logic(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<Option<LogicPayload>, ApiError> {
        ApiClient::generate_logic(self, dtlib_id, dtl_id).await
    }

    async fn generate_all(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
    ) -> Result<GenerationBundle, ApiError> {
        ApiClient::generate_all(self, dtlib_id, dtl_id).await
    }

    async fn update_dtl(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        patch: &DtlPatch,
    ) -> Result<Dtl, ApiError> {
        ApiClient::update_dtl(self, dtlib_id, dtl_id, patch).await
    }

    async fn add_comment(
        &self,
        dtlib_id: &str,
        dtl_id: &str,
        new: &NewComment,
    ) -> Result<ReviewComment, ApiError> {
        ApiClient::add_comment(self, dtlib_id, dtl_id, new).await
    }
}

//! Workflow layer: one authoring session per legal rule, reconciling
//! local edits, backend truth, and generated drafts.

pub mod audit;
pub mod coordinator;
mod error;
pub mod progress;
pub mod session;
pub mod store;

pub use audit::{AuditCache, FileAuditCache, MemoryAuditCache, RawResponses};
pub use coordinator::GenerationCoordinator;
pub use error::WorkflowError;
pub use progress::ProgressEstimate;
pub use session::Session;
pub use store::{ArtifactStore, LoadOutcome, Slot, fetch_artifacts};

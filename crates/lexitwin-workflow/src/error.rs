use lexitwin_client::ApiError;
use lexitwin_core::ArtifactKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Some artifact loads failed while others succeeded; the succeeded
    /// kinds are already applied and stay usable.
    #[error("{}", partial_load_message(failures))]
    PartialLoad {
        failures: Vec<(ArtifactKind, String)>,
    },

    #[error("generation already in progress for {0}")]
    AlreadyGenerating(ArtifactKind),

    /// Bulk generation already running; only one at a time.
    #[error("bulk generation already in progress")]
    BulkGenerationInProgress,

    #[error("a comment is required to request a revision")]
    MissingComment,

    #[error("audit cache I/O error: {0}")]
    Audit(#[from] std::io::Error),
}

fn partial_load_message(failures: &[(ArtifactKind, String)]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|(kind, msg)| format!("{kind}: {msg}"))
        .collect();
    format!("failed to load some artifacts ({})", parts.join("; "))
}

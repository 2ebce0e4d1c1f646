//! REST client for the digital-twin backend and the trait boundary the
//! workflow session consumes.

mod backend;
mod http;

pub use backend::DtlBackend;
pub use http::{ApiClient, ApiError, DtLibQuery, DtlQuery, ReviewAck};

//! HTTP client SDK for log-analytics servers speaking the
//! `/api/v1/query` + `/api/v1/logstream` JSON contract.

mod client;
mod error;
mod types;

pub use client::QueryClient;
pub use error::SdkError;
pub use types::{QueryRequest, QueryResponse, StreamInfo};

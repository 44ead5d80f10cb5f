/// Errors from the query SDK
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// HTTP transport error (connect failure, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },
    /// Response body did not match the expected shape
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

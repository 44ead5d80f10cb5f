use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/query`. Time bounds are RFC3339 UTC strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    pub start_time: String,
    pub end_time: String,
}

/// Combined response of `POST /api/v1/query?fields=true`: the field list in
/// server order plus the matching records. Both keys must be present; a body
/// missing either is a failed fetch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub fields: Vec<String>,
    pub records: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// One entry of `GET /api/v1/logstream`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamInfo {
    pub name: String,
}

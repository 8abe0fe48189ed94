use serde::{Deserialize, Serialize};

/// Body for `POST /v1/extract`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractRequest {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

impl ExtractRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            prompt: None,
            schema: None,
        }
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Response to starting an extract job.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StartExtractResponse {
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

/// Lifecycle of an extract job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStatus {
    Completed,
    Processing,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Response to `GET /v1/extract/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractStatusResponse {
    pub success: bool,
    pub status: Option<ExtractStatus>,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

use reqwest::StatusCode;
use serde_json::Value;

/// Content type of a single DICOM Part 10 file.
pub const DICOM_CONTENT_TYPE: &str = "application/dicom";

/// Content type requested for the store response.
pub const DICOM_JSON_CONTENT_TYPE: &str = "application/dicom+json";

/// Raw outcome of a STOW-RS request. Not checked for success: callers decide what counts as
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInstancesResponse {
    pub status_code: StatusCode,
    pub body: Vec<u8>,
}

impl StoreInstancesResponse {
    pub fn status_text(&self) -> &'static str {
        self.status_code.canonical_reason().unwrap_or("")
    }

    /// The body as a DICOM JSON tag tree, if it is one.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

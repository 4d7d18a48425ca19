pub mod deidentify;
pub mod instance;
pub mod operation;
pub mod store;

use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;

/// Error envelope returned by the service for non-2xx JSON responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl ApiError {
    fn into_error(self, status_code: StatusCode) -> Error {
        let message = match (self.status, self.message) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => String::new(),
        };
        Error::Api {
            status_code,
            message,
        }
    }
}

/// Decodes a JSON body according to its status code: the success type for 2xx responses, the
/// error envelope otherwise. Bodies that are not a valid error envelope keep their raw text.
pub(crate) fn into_result<SuccessT>(status_code: StatusCode, body: &[u8]) -> Result<SuccessT>
where
    for<'de> SuccessT: Deserialize<'de>,
{
    if status_code.is_success() {
        serde_json::from_slice(body).map_err(Error::BadJsonResponse)
    } else {
        match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(response) => Err(response.error.into_error(status_code)),
            Err(_) => Err(Error::Api {
                status_code,
                message: String::from_utf8_lossy(body).trim().to_owned(),
            }),
        }
    }
}

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API request failed with {}: {}", status_code, message)]
    Api {
        status_code: StatusCode,
        message: String,
    },

    #[error("Invalid endpoint `{}`", endpoint)]
    BadEndpoint { endpoint: url::Url },

    #[error("Bad token: {}", token)]
    BadToken { token: String },

    #[error(
        "Expected projects/<project>/locations/<location>/datasets/<dataset>/dicomStores/<store>, got: {}",
        identifier
    )]
    BadStoreReference { identifier: String },

    #[error("Expected a non-empty operation name, got: `{}`", name)]
    BadOperationName { name: String },

    #[error("Could not parse JSON response.")]
    BadJsonResponse(#[source] serde_json::Error),

    #[error("Failed to initialise the HTTP client")]
    BuildHttpClient(#[source] reqwest::Error),

    #[error("HTTP request error: {}", message)]
    ReqwestError {
        message: String,
        source: reqwest::Error,
    },
}

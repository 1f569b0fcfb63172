use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid registry url {0}")]
    InvalidUrl(String),

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("registry answered {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON payload from {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("contract `{contract}` of service `{service}` is not valid JSON")]
    MalformedContract {
        service: String,
        contract: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("environment `{0}` is not present in the service source")]
    UnknownEnvironment(String),
}

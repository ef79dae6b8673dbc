use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid host URL '{url}': {source}")]
    InvalidHost {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported host scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Host URL '{url}' cannot be used as a base URL.")]
    HostNotBase { url: String },
    #[error("Failed to join URL '{path}': {source}")]
    JoinUrlFailed {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build request: {source}")]
    BuildRequestFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to encode album body: {source}")]
    EncodeBody {
        #[source]
        source: serde_json::Error,
    },
}

use crate::config::{DEPLOYMENT_URL_ENV, PUBLIC_URL_ENV};

/// Errors produced while resolving the configuration or building the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to extract frame config: {0}")]
    Config(#[from] figment::Error),
    #[error(
        "no base URL configured: set `{public}` or `{deployment}`",
        public = PUBLIC_URL_ENV,
        deployment = DEPLOYMENT_URL_ENV
    )]
    MissingBaseUrl,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid signaling url '{0}': must start with http:// or https://")]
    InvalidSignalingUrl(String),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModuleError>;

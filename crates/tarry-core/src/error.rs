use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid delay config: {0}")]
    Parse(#[from] serde_json::Error),
}

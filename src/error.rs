use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("browser call failed: {0}")]
    Host(String),
    #[error("{0} is not available")]
    Missing(&'static str),
}

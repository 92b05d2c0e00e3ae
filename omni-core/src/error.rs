use thiserror::Error;

#[derive(Error, Debug)]
pub enum OmniError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl OmniError {
    /// True for errors that map to a 404 at the HTTP layer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OmniError::NotFound(_))
    }
}

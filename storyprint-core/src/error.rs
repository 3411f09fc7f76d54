use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid story request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Unknown story context: {0}")]
    UnknownContext(u64),
}

pub type Result<T> = std::result::Result<T, PrintError>;

impl PrintError {
    /// True for errors caused by caller input rather than the environment
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PrintError::InvalidGeometry(_)
                | PrintError::InvalidRequest(_)
                | PrintError::InvalidConfig(_)
        )
    }
}

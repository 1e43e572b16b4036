use thiserror::Error;

// Custom Application Error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Discovery error: {0}")]
    Discover(#[from] crate::discover::DiscoverError),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

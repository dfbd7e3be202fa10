//! Error types shared by the platform backends.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error("surface initialization failed: {0}")]
    Surface(String),

    #[error("operation not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

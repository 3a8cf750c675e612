//! Error types for the challenge stub

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid realm for WWW-Authenticate header: {0}")]
    InvalidRealm(String),

    #[error("HTTP server error: {0}")]
    HttpServer(String),
}

pub type Result<T> = std::result::Result<T, StubError>;

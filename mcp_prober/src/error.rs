use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProberError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parsing failed: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

pub type Result<T> = std::result::Result<T, ProberError>;

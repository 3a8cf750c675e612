//! # Auth Challenge Stub
//!
//! A tiny HTTP server for exercising the authentication-retry logic of an MCP
//! client. Every `GET` or `POST`, on any path, gets one of two answers:
//!
//! *   **No bearer credential**: `401 Unauthorized` with
//!     `WWW-Authenticate: Bearer realm="<realm>"` and
//!     `{"error":"unauthorized","message":"Authentication required"}`.
//! *   **Any `Authorization: Bearer <token>`**: `200 OK` with
//!     `{"status":"authenticated","message":"Access granted with token"}`.
//!
//! Tokens are never validated and nothing is remembered between requests.
//! Each request is written to the log as an access-log line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use auth_challenge_stub::{StubConfig, start_stub};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     start_stub(StubConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod access_log;
pub mod credential;
pub mod error;
pub mod stub;

pub use credential::Credential;
pub use error::{Result, StubError};
pub use stub::{StubConfig, router, serve, shutdown_signal, start_stub};

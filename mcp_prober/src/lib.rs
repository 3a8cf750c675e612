//! # MCP Prober
//!
//! A diagnostic client for poking at an MCP server that speaks JSON-RPC over
//! HTTP with a server-sent-events stream. It is meant for manual testing: it
//! runs a fixed sequence of steps against one target and prints everything it
//! sends and receives.
//!
//! ## Steps
//!
//! 1. **Raw stream probe**: a hand-written `GET` with `Accept: text/event-stream`
//!    over a plain TCP socket, printing whatever arrives before the peer closes
//!    or the timeout elapses.
//! 2. **Structured calls**: `initialize`, `tools/list`, `resources/list` and
//!    `tools/call` POSTed through [`client::ProbeClient`]. Failures become
//!    locally synthesized JSON-RPC error envelopes so the next call still runs.
//! 3. **Raw structured call**: `initialize` again, written byte-for-byte over a
//!    TCP socket.
//!
//! Each step fails on its own. Only problems outside the steps (a bad target
//! address, an HTTP client that cannot be built) abort the run.
//!
//! ## Usage
//!
//! ```no_run
//! use mcp_prober::{Prober, ProberConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let prober = Prober::new(ProberConfig::default());
//! let report = prober.run(&mut std::io::stdout()).await?;
//! println!("{} step(s) failed", report.failure_count());
//! # Ok(())
//! # }
//! ```

/// HTTP transport for structured JSON-RPC calls.
pub mod client;
/// Prober configuration.
pub mod config;
/// JSON-RPC request and response envelopes.
pub mod envelope;
/// Error types for the prober.
pub mod error;
/// The fixed probe sequence and its report.
pub mod prober;
/// Hand-built HTTP over raw TCP sockets.
pub mod raw;

pub use config::ProberConfig;
pub use error::{ProberError, Result};
pub use prober::{Exchange, ProbeReport, Prober, StepOutcome};

use crate::error::{ProberError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TARGET: &str = "127.0.0.1:8080";
pub const DEFAULT_SSE_PATH: &str = "/sse";
pub const DEFAULT_RPC_PATH: &str = "/mcp";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TOOL_NAME: &str = "echo";
pub const DEFAULT_TOOL_TEXT: &str = "Hello from the MCP prober!";

/// What to probe and how long to wait for each step.
///
/// `Default` reproduces the fixed local setup the prober was written for.
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// `host:port` of the server under test. Used verbatim as the `Host` header.
    pub target: String,

    /// Path requested by the raw stream probe.
    pub sse_path: String,

    /// Path receiving JSON-RPC POSTs.
    pub rpc_path: String,

    /// Applied to every step on its own: connect, request and read.
    pub timeout: Duration,

    pub tool_name: String,
    pub tool_text: String,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            sse_path: DEFAULT_SSE_PATH.to_string(),
            rpc_path: DEFAULT_RPC_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            tool_text: DEFAULT_TOOL_TEXT.to_string(),
        }
    }
}

impl ProberConfig {
    /// Full URL of the JSON-RPC endpoint.
    pub fn rpc_url(&self) -> Result<Url> {
        let target = self.target.trim();
        if target.is_empty() || target.contains('/') {
            return Err(ProberError::InvalidTarget(self.target.clone()));
        }

        let has_port = target
            .rsplit_once(':')
            .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
        if !has_port {
            return Err(ProberError::InvalidTarget(format!(
                "{} (missing port)",
                self.target
            )));
        }

        let base = Url::parse(&format!("http://{target}"))?;
        Ok(base.join(&self.rpc_path)?)
    }
}

use clap::Parser;
use mcp_prober::config::{
    DEFAULT_RPC_PATH, DEFAULT_SSE_PATH, DEFAULT_TARGET, DEFAULT_TIMEOUT_SECS, DEFAULT_TOOL_NAME,
    DEFAULT_TOOL_TEXT,
};
use mcp_prober::{Prober, ProberConfig};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Probe an MCP server over JSON-RPC/HTTP and raw sockets, printing every
/// exchange.
///
/// Without flags it targets the local development server on 127.0.0.1:8080.
#[derive(Parser, Debug)]
#[command(name = "mcp_prober")]
#[command(version, about)]
struct Args {
    /// host:port of the server under test.
    #[arg(long, default_value = DEFAULT_TARGET)]
    target: String,

    /// Path opened by the raw event-stream probe.
    #[arg(long, default_value = DEFAULT_SSE_PATH)]
    sse_path: String,

    /// Path receiving JSON-RPC POST requests.
    #[arg(long, default_value = DEFAULT_RPC_PATH)]
    rpc_path: String,

    /// Per-step timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Tool invoked by the tools/call step.
    #[arg(long, default_value = DEFAULT_TOOL_NAME)]
    tool_name: String,

    /// Text argument passed to that tool.
    #[arg(long, default_value = DEFAULT_TOOL_TEXT)]
    tool_text: String,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ProberConfig {
    fn from(args: Args) -> Self {
        Self {
            target: args.target,
            sse_path: args.sse_path,
            rpc_path: args.rpc_path,
            timeout: Duration::from_secs(args.timeout_secs),
            tool_name: args.tool_name,
            tool_text: args.tool_text,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the transcript.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let prober = Prober::new(ProberConfig::from(args));
    let mut stdout = std::io::stdout();

    match prober.run(&mut stdout).await {
        Ok(report) => {
            tracing::info!(
                failed_steps = report.failure_count(),
                "Probe complete"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("Probe aborted: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_local_server() {
        let args = Args::parse_from(["mcp_prober"]);
        let config = ProberConfig::from(args);
        assert_eq!(config.target, "127.0.0.1:8080");
        assert_eq!(config.rpc_path, "/mcp");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn args_override_target_and_timeout() {
        let args = Args::parse_from([
            "mcp_prober",
            "--target",
            "10.0.0.2:9000",
            "--timeout-secs",
            "2",
            "--tool-name",
            "say",
        ]);
        let config = ProberConfig::from(args);
        assert_eq!(config.target, "10.0.0.2:9000");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.tool_name, "say");
    }
}

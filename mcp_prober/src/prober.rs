use crate::client::ProbeClient;
use crate::config::ProberConfig;
use crate::envelope::{JsonRpcRequest, JsonRpcResponse, initialize_request, standard_calls};
use crate::error::Result;
use crate::raw::{self, RawExchange};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{error, info, warn};

/// Result of one raw socket step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Received(RawExchange),
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// One structured call and what came back for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub request: JsonRpcRequest,
    pub response: JsonRpcResponse,
    pub id_matches: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub stream_probe: StepOutcome,
    pub exchanges: Vec<Exchange>,
    pub raw_call: StepOutcome,
}

impl ProbeReport {
    /// Steps that produced no usable server reply.
    pub fn failure_count(&self) -> usize {
        let raw_failures = [&self.stream_probe, &self.raw_call]
            .into_iter()
            .filter(|outcome| outcome.is_failed())
            .count();
        let call_failures = self
            .exchanges
            .iter()
            .filter(|exchange| exchange.response.is_error())
            .count();
        raw_failures + call_failures
    }
}

/// Transcript writer that always ends with the disconnect line, however the
/// run exits.
struct Transcript<'a, W: Write> {
    out: &'a mut W,
    target: String,
}

impl<W: Write> Write for Transcript<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for Transcript<'_, W> {
    fn drop(&mut self) {
        let _ = writeln!(self.out, "Disconnected from {}", self.target);
        let _ = self.out.flush();
    }
}

/// Runs the fixed probe sequence against one target.
pub struct Prober {
    config: ProberConfig,
}

impl Prober {
    pub fn new(config: ProberConfig) -> Self {
        Self { config }
    }

    /// Runs every step in order, printing a transcript to `out`.
    ///
    /// Step failures are reported in the transcript and the returned
    /// [`ProbeReport`]. An `Err` means the run could not proceed at all.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<ProbeReport> {
        let config = &self.config;
        let mut out = Transcript {
            out,
            target: config.target.clone(),
        };

        let rpc_url = config.rpc_url()?;
        let client = ProbeClient::new(rpc_url, config.timeout)?;
        info!(peer = %config.target, rpc_url = %client.url(), "Starting probe");

        writeln!(out, "=== Raw stream probe: GET {} ===", config.sse_path)?;
        let stream_probe =
            raw::stream_probe(&config.target, &config.sse_path, config.timeout).await;
        let stream_probe = match stream_probe {
            Ok(exchange) => {
                write_raw(&mut out, &exchange)?;
                StepOutcome::Received(exchange)
            }
            Err(e) => {
                error!("Socket error: {}", e);
                writeln!(out, "Socket error: {e}")?;
                StepOutcome::Failed(e.to_string())
            }
        };

        writeln!(out, "=== JSON-RPC calls: POST {} ===", client.url())?;
        let mut exchanges = Vec::new();
        for request in standard_calls(&config.tool_name, &config.tool_text) {
            let response = client.call(&request).await;
            let exchange = record_exchange(&mut out, request, response)?;
            exchanges.push(exchange);
        }

        writeln!(out, "=== Raw JSON-RPC call: POST {} ===", config.rpc_path)?;
        let request = initialize_request(1);
        writeln!(out, "Request:\n{}", pretty(&request))?;
        let raw_call =
            raw::raw_rpc_call(&config.target, &config.rpc_path, &request, config.timeout).await;
        let raw_call = match raw_call {
            Ok(exchange) => {
                write_raw(&mut out, &exchange)?;
                StepOutcome::Received(exchange)
            }
            Err(e) => {
                error!("Socket error: {}", e);
                writeln!(out, "Socket error: {e}")?;
                StepOutcome::Failed(e.to_string())
            }
        };

        let report = ProbeReport {
            stream_probe,
            exchanges,
            raw_call,
        };
        info!(failures = report.failure_count(), "Probe finished");
        Ok(report)
    }
}

fn record_exchange<W: Write>(
    out: &mut W,
    request: JsonRpcRequest,
    response: JsonRpcResponse,
) -> Result<Exchange> {
    writeln!(out, "--- {} (id {}) ---", request.method, request.id)?;
    writeln!(out, "Request:\n{}", pretty(&request))?;
    writeln!(out, "Response:\n{}", pretty(&response))?;

    let id_matches = response.echoes(&request);
    if !id_matches {
        warn!(
            method = %request.method,
            expected = request.id,
            received = %response.id,
            "Response id does not match request id"
        );
        writeln!(
            out,
            "Warning: response id {} does not match request id {}",
            response.id, request.id
        )?;
    }

    Ok(Exchange {
        request,
        response,
        id_matches,
    })
}

fn write_raw<W: Write>(out: &mut W, exchange: &RawExchange) -> io::Result<()> {
    writeln!(out, "Received {} byte(s):", exchange.bytes.len())?;
    writeln!(out, "{}", exchange.text())?;
    if exchange.timed_out {
        writeln!(out, "(connection still open when the timeout elapsed)")?;
    }
    Ok(())
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

use crate::envelope::{JsonRpcRequest, JsonRpcResponse};
use crate::error::Result;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

const ACCEPT_JSON_OR_STREAM: &str = "application/json, text/event-stream";

/// Posts JSON-RPC envelopes to a single endpoint.
///
/// [`ProbeClient::call`] never fails: anything that keeps a real response from
/// arriving is folded into a locally synthesized error envelope.
pub struct ProbeClient {
    client: reqwest::Client,
    url: Url,
}

impl ProbeClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, id = request.id, url = %self.url, "Sending JSON-RPC request");

        let res = match self
            .client
            .post(self.url.clone())
            .header(ACCEPT, ACCEPT_JSON_OR_STREAM)
            .json(request)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                error!(method = %request.method, "Request failed: {}", e);
                return JsonRpcResponse::local_error(request.id, format!("Request failed: {e}"));
            }
        };

        let status = res.status();
        if status != StatusCode::OK {
            let text = res.text().await.unwrap_or_default();
            error!(method = %request.method, "HTTP error: {} - {}", status, text);
            return JsonRpcResponse::local_error(
                request.id,
                format!("HTTP error: {}", status.as_u16()),
            );
        }

        match res.json::<JsonRpcResponse>().await {
            Ok(response) => response,
            Err(e) => {
                warn!(method = %request.method, "Response was not a JSON-RPC envelope: {}", e);
                JsonRpcResponse::local_error(request.id, format!("Invalid JSON response: {e}"))
            }
        }
    }
}

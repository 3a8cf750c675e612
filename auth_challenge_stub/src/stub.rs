//! HTTP server answering every request with either a success payload or a
//! bearer challenge

use crate::access_log::log_access;
use crate::credential::Credential;
use crate::error::{Result, StubError};
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::{future::Future, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:23880";
pub const DEFAULT_REALM: &str = "http://localhost:8080/realms/master";

/// Configuration for the challenge stub.
///
/// # Example
///
/// ```rust
/// use auth_challenge_stub::StubConfig;
///
/// let config = StubConfig {
///     bind_addr: "127.0.0.1:0".parse().unwrap(),
///     ..StubConfig::default()
/// };
/// assert_eq!(config.realm, "http://localhost:8080/realms/master");
/// ```
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Address to listen on. Port 0 picks a free port.
    pub bind_addr: SocketAddr,

    /// Realm echoed in the `WWW-Authenticate` challenge. Never validated.
    pub realm: String,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 23880)),
            realm: DEFAULT_REALM.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GrantedBody {
    status: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct ChallengeBody {
    error: &'static str,
    message: &'static str,
}

const GRANTED: GrantedBody = GrantedBody {
    status: "authenticated",
    message: "Access granted with token",
};

const CHALLENGE: ChallengeBody = ChallengeBody {
    error: "unauthorized",
    message: "Authentication required",
};

struct StubState {
    challenge: HeaderValue,
}

pub fn challenge_header_value(realm: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer realm=\"{realm}\""))
        .map_err(|_| StubError::InvalidRealm(realm.to_string()))
}

/// Builds the router: `GET` and `POST` on every path share one handler.
pub fn router(realm: &str) -> Result<Router> {
    let state = Arc::new(StubState {
        challenge: challenge_header_value(realm)?,
    });

    Ok(Router::new()
        .route("/", get(handle_request).post(handle_request))
        .route("/{*path}", get(handle_request).post(handle_request))
        .layer(middleware::from_fn(log_access))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn handle_request(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    match Credential::from_headers(&headers) {
        Credential::Bearer(_) => {
            debug!("Bearer credential present, granting access");
            json_response(StatusCode::OK, &GRANTED)
        }
        Credential::Missing => {
            debug!("No bearer credential, sending challenge");
            let mut response = json_response(StatusCode::UNAUTHORIZED, &CHALLENGE);
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, state.challenge.clone());
            response
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap_or_default()))
        .unwrap_or_else(|_| (status, "Failed to create response").into_response())
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: &StubConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(&config.realm)?;

    let local_addr = listener.local_addr()?;
    info!("Challenge stub listening on http://{}", local_addr);
    info!("Realm: {}", config.realm);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| StubError::HttpServer(format!("Server error: {}", e)))?;

    info!("Challenge stub stopped");
    Ok(())
}

/// Binds `config.bind_addr` and serves until Ctrl+C or SIGTERM.
pub async fn start_stub(config: StubConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await.inspect_err(|e| {
        error!("Failed to bind {}: {}", config.bind_addr, e);
    })?;

    serve(listener, &config, shutdown_signal()).await
}

/// Resolves on the first SIGINT or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term_signal) => {
                term_signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

use auth_challenge_stub::stub::{DEFAULT_BIND_ADDR, DEFAULT_REALM};
use auth_challenge_stub::{StubConfig, start_stub};
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// HTTP stub that challenges every caller lacking a bearer token.
///
/// Point an OAuth-capable MCP client at it to watch the client react to
/// `401` + `WWW-Authenticate`, then retry with any `Bearer` token.
#[derive(Parser, Debug)]
#[command(name = "auth_challenge_stub")]
#[command(version, about)]
struct Args {
    /// Address to bind the HTTP server.
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind_addr: SocketAddr,

    /// Realm announced in the WWW-Authenticate challenge.
    #[arg(long, default_value = DEFAULT_REALM)]
    realm: String,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StubConfig {
        bind_addr: args.bind_addr,
        realm: args.realm,
    };

    tracing::info!("Starting auth challenge stub on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to stop");

    start_stub(config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_local_stub() {
        let args = Args::parse_from(["auth_challenge_stub"]);
        assert_eq!(args.bind_addr.to_string(), "127.0.0.1:23880");
        assert_eq!(args.realm, "http://localhost:8080/realms/master");
    }

    #[test]
    fn args_accept_custom_bind_and_realm() {
        let args = Args::parse_from([
            "auth_challenge_stub",
            "--bind-addr",
            "0.0.0.0:9999",
            "--realm",
            "https://idp.example/realms/dev",
        ]);
        assert_eq!(args.bind_addr.port(), 9999);
        assert_eq!(args.realm, "https://idp.example/realms/dev");
    }
}

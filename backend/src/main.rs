//! Service entry-point: configuration, persistence wiring and the listener.
//!
//! All configuration is resolved here and injected into constructors; no
//! business logic reads the process environment.

mod server;

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use landmark_api::domain::{TokenSigner, DEFAULT_TTL};
use landmark_api::inbound::http::health::HealthState;
use landmark_api::inbound::http::state::HttpState;
use landmark_api::outbound::persistence::{run_migrations, DbPool, PoolConfig};

use server::{create_server, ServerConfig};

/// Resolve the token signing secret.
///
/// Reads `JWT_SECRET_FILE` (preferred) or `JWT_SECRET`. A missing secret is
/// fatal unless `AUTH_ALLOW_EPHEMERAL=1` (or a debug build) explicitly opts
/// into a random per-process secret, which invalidates all tokens on
/// restart. There is no hardcoded fallback.
fn resolve_signing_secret() -> std::io::Result<Vec<u8>> {
    if let Ok(path) = env::var("JWT_SECRET_FILE") {
        return std::fs::read(&path).map_err(|e| {
            std::io::Error::other(format!("failed to read signing secret at {path}: {e}"))
        });
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        return Ok(secret.into_bytes());
    }

    let allow_dev = env::var("AUTH_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
    if cfg!(debug_assertions) || allow_dev {
        warn!("using ephemeral signing secret (dev only); tokens die with this process");
        let mut secret = vec![0u8; 64];
        getrandom::getrandom(&mut secret)
            .map_err(|e| std::io::Error::other(format!("secret generation failed: {e}")))?;
        Ok(secret)
    } else {
        Err(std::io::Error::other(
            "no signing secret configured: set JWT_SECRET_FILE or JWT_SECRET",
        ))
    }
}

fn token_ttl() -> Duration {
    env::var("TOKEN_TTL_MINUTES")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map_or(DEFAULT_TTL, |minutes| Duration::from_secs(minutes * 60))
}

fn bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {e}")))
}

async fn build_http_state(signer: TokenSigner) -> std::io::Result<HttpState> {
    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            run_migrations(&database_url)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            info!("persistence: PostgreSQL");
            Ok(HttpState::with_pool(pool, signer))
        }
        Err(_) => {
            warn!("DATABASE_URL not set; using in-memory persistence (dev only)");
            Ok(HttpState::in_memory(signer))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let secret = resolve_signing_secret()?;
    let signer = TokenSigner::new(secret, token_ttl())
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let http_state = build_http_state(signer).await?;
    let bind_addr = bind_addr()?;
    let health_state = web::Data::new(HealthState::new());

    info!(%bind_addr, "starting landmark api");
    let server = create_server(
        health_state,
        ServerConfig::new(bind_addr, http_state),
    )?;
    server.await
}

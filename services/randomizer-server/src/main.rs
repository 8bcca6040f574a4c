//! Randomizer API Server
//!
//! REST API server for the Randomizer backend. Accounts live in a hosted
//! user pool; the server keeps a local mirror and stores per-user random
//! number items.
//!
//! # Features
//!
//! - Delegated identity (hosted user pool) or local JWT issuance
//! - Scope-gated endpoints for profile and item access
//! - OpenAPI documentation with Swagger UI
//! - Graceful shutdown handling
//! - Health check endpoints
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! randomizer-server
//!
//! # Start with custom config
//! randomizer-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! RANDOMIZER__SERVER__PORT=8080 randomizer-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use randomizer_api::{create_router, ApiConfig, AppState};
use randomizer_db::{Database, DatabaseConfig as DbConfig};
use randomizer_identity::{AuthStrategy, LocalAuthConfig, ProviderConfig};

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Randomizer API Server
#[derive(Parser, Debug)]
#[command(name = "randomizer-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "RANDOMIZER_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "RANDOMIZER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "RANDOMIZER_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RANDOMIZER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "RANDOMIZER_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Identity strategy: "delegated" or "local"
    #[arg(long, env = "RANDOMIZER_IDENTITY_STRATEGY")]
    identity_strategy: Option<String>,

    /// Provider region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// User pool id
    #[arg(long, env = "AWS_USER_POOL_ID")]
    user_pool_id: Option<String>,

    /// App client id
    #[arg(long, env = "AWS_COGNITO_APP_CLIENT_ID")]
    client_id: Option<String>,

    /// App client secret
    #[arg(long, env = "AWS_COGNITO_APP_CLIENT_SECRET")]
    client_secret: Option<String>,

    /// JWT secret key (local strategy)
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Enable development mode (relaxed security)
    #[arg(long, env = "RANDOMIZER_DEV_MODE")]
    dev_mode: bool,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(db_url) = args.database_url {
        server_config.database.postgres_url = db_url;
    }
    if let Some(strategy) = args.identity_strategy {
        server_config.identity.strategy = strategy;
    }
    if let Some(region) = args.region {
        server_config.identity.region = region;
    }
    if let Some(pool_id) = args.user_pool_id {
        server_config.identity.user_pool_id = pool_id;
    }
    if let Some(client_id) = args.client_id {
        server_config.identity.client_id = client_id;
    }
    if let Some(client_secret) = args.client_secret {
        server_config.identity.client_secret = client_secret;
    }
    if let Some(jwt_secret) = args.jwt_secret {
        server_config.identity.jwt_secret = jwt_secret;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    // Initialize logging
    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Randomizer API Server"
    );

    // Validate configuration
    validate_config(&server_config, args.dev_mode)?;

    // Initialize database
    let db = init_database(&server_config.database).await?;

    // Initialize identity strategy
    let identity = init_identity(&server_config.identity)?;

    // Create application state
    let state = Arc::new(AppState::new(db, identity));

    // Create API configuration
    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_compression: server_config.api.enable_compression,
        enable_tracing: server_config.api.enable_tracing,
    };

    // Create router
    let app = create_router(state, api_config);

    // Get bind address
    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        strategy = %server_config.identity.strategy,
        "Server listening"
    );

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    match config.identity.strategy.as_str() {
        "delegated" => {
            if config.identity.user_pool_id.is_empty()
                || config.identity.client_id.is_empty()
                || config.identity.client_secret.is_empty()
            {
                anyhow::bail!(
                    "Delegated identity requires AWS_USER_POOL_ID, AWS_COGNITO_APP_CLIENT_ID \
                     and AWS_COGNITO_APP_CLIENT_SECRET"
                );
            }
        }
        "local" => {
            if !dev_mode && config.identity.jwt_secret == "change-me-in-production" {
                anyhow::bail!(
                    "JWT secret must be changed in production. Set JWT_SECRET environment variable."
                );
            }
        }
        other => anyhow::bail!("Unknown identity strategy: {other}"),
    }

    Ok(())
}

/// Initialize database connection
async fn init_database(config: &config::DatabaseSettings) -> anyhow::Result<Arc<Database>> {
    tracing::info!("Connecting to database...");

    let db_config = DbConfig {
        postgres_url: config.postgres_url.clone(),
        pg_max_connections: config.max_connections,
        pg_min_connections: config.min_connections,
        pg_acquire_timeout_secs: config.connect_timeout_secs,
    };

    let db = Database::connect(&db_config).await?;

    if config.run_migrations {
        db.migrate().await?;
    }

    if !db.health_check().await? {
        anyhow::bail!("Database health check failed");
    }

    tracing::info!("Database connected successfully");

    Ok(Arc::new(db))
}

/// Initialize the identity strategy
fn init_identity(settings: &config::IdentitySettings) -> anyhow::Result<Arc<AuthStrategy>> {
    let strategy = if settings.is_delegated() {
        tracing::info!(
            region = %settings.region,
            user_pool_id = %settings.user_pool_id,
            "Using delegated identity"
        );

        let provider_config = ProviderConfig {
            region: settings.region.clone(),
            user_pool_id: settings.user_pool_id.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            endpoint: settings.endpoint.clone(),
            ..ProviderConfig::default()
        };

        AuthStrategy::delegated(&provider_config)?
    } else {
        tracing::info!("Using local identity");

        AuthStrategy::local(LocalAuthConfig {
            secret: settings.jwt_secret.clone(),
            access_token_lifetime: Duration::from_secs(settings.access_token_lifetime_secs),
            refresh_token_lifetime: Duration::from_secs(settings.refresh_token_lifetime_secs),
        })
    };

    Ok(Arc::new(strategy))
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // Allow time for in-flight requests to complete
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );

    tokio::time::sleep(timeout).await;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["randomizer-server", "--port", "8080"]);
        assert_eq!(args.port, Some(8080));
    }

    #[test]
    fn test_development_config() {
        let config = ServerConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.identity.strategy, "local");
    }

    #[test]
    fn test_validate_rejects_default_jwt_secret() {
        let config = ServerConfig::development();
        assert!(validate_config(&config, false).is_err());
        assert!(validate_config(&config, true).is_ok());
    }
}

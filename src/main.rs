// Main entry point for the estate user-admin service

use anyhow::Context;
use estate_user_admin::api::{create_router, AppState, IdentityProvider, ProfileStore};
use estate_user_admin::auth::audit_logger::AuditLogger;
use estate_user_admin::config::Config;
use estate_user_admin::infra::pg_profile_store::PgProfileStore;
use estate_user_admin::infra::supabase::SupabaseClient;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber with config values
    init_tracing(&config)?;

    info!("Starting estate user-admin service");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        supabase_url = %config.supabase_url,
        "Configuration loaded"
    );

    // 3. Supabase client (identity provider, and profile store unless DATABASE_URL is set)
    let supabase = Arc::new(
        SupabaseClient::new(
            &config.supabase_url,
            config.service_role_key.clone(),
            config.upstream_timeout_secs,
        )
        .context("Failed to create Supabase client")?,
    );
    let identity: Arc<dyn IdentityProvider + Send + Sync> = supabase.clone();

    // 4. Profile store: direct Postgres if configured, PostgREST otherwise
    let profiles: Arc<dyn ProfileStore + Send + Sync> = match config.database_url {
        Some(ref database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await.map_err(|e| {
                error!(error = %e, "Failed to connect to database");
                e
            })?;
            info!("Profile store: Postgres");
            Arc::new(PgProfileStore::new(pool))
        }
        None => {
            info!("Profile store: Supabase REST");
            supabase
        }
    };

    // 5. Create AppState
    let app_state = AppState {
        identity,
        profiles,
        audit_logger: Arc::new(AuditLogger::new()),
        config: Arc::new(config.clone()),
    };

    // 6. Create router
    let router = create_router(&app_state).with_state(app_state);

    // 7. Start HTTP server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}

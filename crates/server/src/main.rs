use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use domain::{policy::ContentPolicy, TokenCodec};
use plaza::{
    board::{Board, Limits},
    config::Settings,
    http::router::build_router,
    state::AppState,
};
use storage::Db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let settings = Settings::new().context("Failed to load configuration")?;

    if settings.security.token_secret == "dev" {
        warn!("Using the default token secret, set PLAZA_SECURITY__TOKEN_SECRET in production");
    }

    let db = Db::new(&settings.database.url).await?;

    let board = Board::new(
        db,
        TokenCodec::new(&settings.security.token_secret),
        ContentPolicy {
            max_links: settings.limits.max_links,
        },
        Limits {
            post_cooldown: settings.limits.post_cooldown_seconds,
            comment_cooldown: settings.limits.comment_cooldown_seconds,
        },
    );

    let state = AppState {
        board,
        admin_token: settings.security.admin_token.clone(),
    };

    let app = build_router(state, &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

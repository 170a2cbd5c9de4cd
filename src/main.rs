use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use worklog::config::{Config, LogFormat};
use worklog::handlers::{CreatedResponse, MessageResponse, WorkLogRequest, WorkLogResponse};
use worklog::models::WorkStatus;
use worklog::state::AppState;
use worklog::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::work_log::list_work_logs,
        handlers::work_log::create_work_log,
        handlers::work_log::update_work_log,
        handlers::work_log::delete_work_log,
    ),
    components(schemas(
        WorkLogRequest,
        WorkLogResponse,
        CreatedResponse,
        MessageResponse,
        WorkStatus,
    )),
    tags(
        (name = "Work logs", description = "Work log CRUD endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let addr = config.server_addr();

    // Initialize application state (connects to the store, migrates, seeds)
    tracing::info!(backend = ?config.store_backend, "Opening work log store...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

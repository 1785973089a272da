use application::StudentApp;
use axum::{extract::Request, ServiceExt};
use config::Config;
use frontend::HtmlRenderer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod method_override;
mod routes;

use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("api_server=debug,tower_http=debug")),
        )
        .init();

    info!("🚀 Starting Student Registry");

    // Load configuration from environment
    let config = Config::from_env()?;
    config.log_summary();

    // The store handle is built once here and shared by every request
    let student_app = Arc::new(StudentApp::new(
        &config.database_url,
        config.store_timeout,
    )?);
    let app_state = AppState {
        student_app,
        renderer: Arc::new(HtmlRenderer),
    };

    let app = routes::app(app_state);

    // Run the server
    let bind_address = config.api_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🌐 Server listening on http://{}", bind_address);
    info!("📖 Routes:");
    info!("   GET    /                   - List all students");
    info!("   GET    /students/new       - New student form");
    info!("   POST   /students           - Create student");
    info!("   GET    /students/:id       - Student details");
    info!("   GET    /students/:id/edit  - Edit student form");
    info!("   PUT    /students/:id       - Update student");
    info!("   DELETE /students/:id       - Delete student");
    info!("   GET    /health             - Health check");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Student Registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

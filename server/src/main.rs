mod config;
mod guard;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::ConsoleConfig::from_env().expect("invalid console configuration");
    let port = config.port;
    tracing::info!(api_url = %config.api_url, mode = ?config.mode, "backend configured");

    let state = state::AppState::new(config).expect("failed to build backend HTTP client");
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "console listening");
    axum::serve(listener, app).await.expect("server failed");
}

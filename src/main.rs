use tally_api_rust::{app, config, store, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Tally API in {:?} mode", config.environment);

    let store = store::from_config(config)
        .await
        .unwrap_or_else(|e| panic!("failed to initialize storage: {}", e));
    tracing::info!("Storage backend: {}", store.backend_name());

    let app = app(AppState { store });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

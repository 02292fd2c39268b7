use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use linkedevents_server::routes::create_routes;
use linkedevents_server::store::PgStore;
use linkedevents_server::{AppState, Config};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();
    let config = Config::from_env();

    let store = PgStore::connect(&config)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    store.migrate().await.expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    store
        .ensure_data_source(&config.system_data_source_id, "System")
        .await
        .expect("Failed to create the system data source");

    let addr = config.listen_addr;
    let app = create_routes(AppState::new(Arc::new(store), config));

    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

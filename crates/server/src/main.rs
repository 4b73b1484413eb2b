use server::clients::chess_api::AnalysisClient;
use server::clients::chess_com::ChessComClient;
use server::clients::lichess::LichessClient;
use server::config::Config;
use server::registry::ChampionRegistry;
use server::routes;
use server::session::SessionStore;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let registry = ChampionRegistry::new(&config.champions_path);
    let lichess = LichessClient::new();
    let chess_com = ChessComClient::new();
    let analysis = AnalysisClient::new(&config.analysis_url);
    let store = SessionStore::new();

    tracing::info!("Champions registry at {}", config.champions_path);
    tracing::info!("Analysis API at {}", config.analysis_url);

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::router(config, registry, lichess, chess_com, analysis, store);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use server::clients::chess_api::AnalysisClient;
use server::clients::chess_com::ChessComClient;
use server::clients::lichess::LichessClient;
use server::config::Config;
use server::registry::ChampionRegistry;
use server::routes;
use server::session::SessionStore;

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000_000)
}

/// Write a champions JSON file into the temp dir and return its path.
pub fn write_champions_file(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("champions-{}.json", unique_suffix()));
    std::fs::write(&path, contents).expect("Failed to write champions file");
    path
}

/// A small registry with one fully-linked champion and one with no accounts.
pub fn default_champions() -> &'static str {
    r#"[
        {"id": 11, "name": "Bobby Fischer", "dob": "1943-03-09", "chess_com": null, "lichess": null},
        {"id": 13, "name": "Garry Kasparov", "dob": "1963-04-13", "chess_com": null, "lichess": null},
        {"id": 16, "name": "Magnus Carlsen", "dob": "1990-11-30", "chess_com": "MagnusCarlsen", "lichess": "DrNykterstein"}
    ]"#
}

/// External endpoints the app under test talks to. Point these at mockito
/// servers (or at nothing, for tests that never fetch).
pub struct Upstreams {
    pub lichess_url: String,
    pub chess_com_url: String,
    pub analysis_url: String,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self {
            lichess_url: "http://127.0.0.1:1".to_string(),
            chess_com_url: "http://127.0.0.1:1".to_string(),
            analysis_url: "http://127.0.0.1:1".to_string(),
        }
    }
}

/// Spawn the full app on an ephemeral port and return its base URL.
pub async fn spawn_app(champions_path: &std::path::Path, upstreams: Upstreams) -> String {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        champions_path: champions_path.display().to_string(),
        analysis_url: upstreams.analysis_url.clone(),
        analysis_depth: 12,
        max_games_per_platform: 50,
    };

    let registry = ChampionRegistry::new(champions_path);
    let lichess = LichessClient::with_base_url(&upstreams.lichess_url);
    let chess_com = ChessComClient::with_base_url(&upstreams.chess_com_url);
    let analysis = AnalysisClient::new(&upstreams.analysis_url);
    let store = SessionStore::new();

    let app = routes::router(config, registry, lichess, chess_com, analysis, store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    format!("http://{addr}")
}

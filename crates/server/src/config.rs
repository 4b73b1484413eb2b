use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub champions_path: String,
    pub analysis_url: String,
    pub analysis_depth: u32,
    pub max_games_per_platform: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            champions_path: env::var("CHAMPIONS_PATH")
                .unwrap_or_else(|_| "data/champions.json".to_string()),
            analysis_url: env::var("ANALYSIS_API_URL")
                .unwrap_or_else(|_| "https://chess-api.com/v1".to_string()),
            analysis_depth: env::var("ANALYSIS_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            max_games_per_platform: env::var("MAX_GAMES_PER_PLATFORM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }
}

pub const DEFAULT_PROVIDER_URL: &str = "https://quizapi.io/api/v1/questions";

#[derive(Debug, Clone)]
pub struct Config {
    pub quiz_api_key: Option<String>,
    pub quiz_api_url: String,
    pub host: String,
    pub port: u16,
    pub snapshot_path: Option<String>,
}

impl Config {
    /// A missing or empty QUIZ_API_KEY is tolerated here; the quiz endpoint
    /// reports it per request instead of failing startup.
    pub fn from_env() -> Self {
        Self {
            quiz_api_key: env_nonempty("QUIZ_API_KEY"),
            quiz_api_url: env_nonempty("QUIZ_API_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            host: env_nonempty("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_nonempty("BACKEND_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            snapshot_path: env_nonempty("LOCAL_STATE_PATH"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_api_key: None,
            quiz_api_url: DEFAULT_PROVIDER_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            snapshot_path: None,
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

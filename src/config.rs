use std::{env, time::Duration};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DB: &str = "order_management";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub server_timeout: Duration,
}

impl Settings {
    /// Resolves settings through `lookup`, so callers decide where values come from.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongodb_uri = non_empty("MONGODB_URI")
            .or_else(|| non_empty("MONGODB_URL"))
            .unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());

        let mongodb_db = non_empty("MONGODB_DB")
            .or_else(|| non_empty("DATABASE_NAME"))
            .unwrap_or_else(|| DEFAULT_MONGODB_DB.to_string());

        let timeout_secs = non_empty("MONGODB_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Settings {
            mongodb_uri,
            mongodb_db,
            server_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    Settings::from_lookup(|key| env::var(key).ok())
}

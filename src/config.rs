// src/config.rs
// All values load from the environment, with .env support.

use std::str::FromStr;

use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    // ── Dialogue Annotation Service
    pub dialogue_base_url: String,
    pub dialogue_api_key: String,

    // ── Intent Classification Service
    pub intent_base_url: String,
    pub intent_api_key: String,
    pub intent_model: String,

    // ── Example Store
    pub store_base_url: String,
    pub store_api_key: String,

    // ── Task Polling
    pub poll_interval_ms: u64,
    pub max_polls: u32,

    // ── Logging Configuration
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match val.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                default
            }
        },
        Err(_) => default,
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            dialogue_base_url: env_var_or(
                "CHAT_DIALOGUE_URL",
                "https://api.oneai.example".to_string(),
            ),
            dialogue_api_key: env_var_or("CHAT_DIALOGUE_API_KEY", String::new()),
            intent_base_url: env_var_or(
                "CHAT_INTENT_URL",
                "https://api.zeroshot.example".to_string(),
            ),
            intent_api_key: env_var_or("CHAT_INTENT_API_KEY", String::new()),
            intent_model: env_var_or(
                "CHAT_INTENT_MODEL",
                "facebook/bart-large-mnli".to_string(),
            ),
            store_base_url: env_var_or(
                "CHAT_STORE_URL",
                "https://api.oneai.example".to_string(),
            ),
            store_api_key: env_var_or("CHAT_STORE_API_KEY", String::new()),
            poll_interval_ms: env_var_or("CHAT_POLL_INTERVAL_MS", 50),
            max_polls: env_var_or("CHAT_MAX_POLLS", 600),
            log_level: env_var_or("CHAT_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<AnalyticsConfig> = Lazy::new(AnalyticsConfig::from_env);

use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_GENERATION_MODEL_ID: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub hf_api_key: String,
    pub inference_base_url: String,
    pub generation_model_id: String,
    pub generation_timeout_secs: u64,
    pub embedding_cache_dir: Option<String>,
    pub prewarm_embedding_model: bool,
    pub cors_allowed_origins: Vec<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            hf_api_key: get_env("HF_API_KEY")?,
            inference_base_url: get_env_or("INFERENCE_BASE_URL", DEFAULT_INFERENCE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            generation_model_id: get_env_or("GENERATION_MODEL_ID", DEFAULT_GENERATION_MODEL_ID),
            generation_timeout_secs: get_env_parse_or(
                "GENERATION_TIMEOUT_SECS",
                DEFAULT_GENERATION_TIMEOUT_SECS,
            )?,
            embedding_cache_dir: env::var("EMBEDDING_CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            prewarm_embedding_model: get_env_parse_or("PREWARM_EMBEDDING_MODEL", true)?,
            cors_allowed_origins: parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

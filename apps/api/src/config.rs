use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Datelike;

use crate::recommendation::query::ProfileField;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    pub port: u16,
    pub rust_log: String,
    pub recommendation: RecommendationConfig,
    pub links: LinkConfig,
    /// Profile attributes that must be present before the personalized
    /// scholarship endpoint calls the generator.
    pub required_profile_fields: Vec<ProfileField>,
}

/// Tuning knobs for the recommendation engine.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    pub scholarship_count: u32,
    pub target_year: i32,
    pub max_tokens: u32,
    pub temperature: f32,
    pub generation_timeout: Duration,
    pub overlapping_display_count: usize,
}

/// Link resolution settings.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub enabled: bool,
    pub page_timeout: Duration,
    /// Page bodies are read up to this many bytes.
    pub max_page_bytes: usize,
    pub concurrency: usize,
    pub skip_domains: Vec<String>,
    pub placeholder_domains: Vec<String>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            scholarship_count: 10,
            target_year: chrono::Utc::now().year(),
            max_tokens: 1500,
            temperature: 0.7,
            generation_timeout: Duration::from_secs(60),
            overlapping_display_count: 3,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_timeout: Duration::from_secs(30),
            max_page_bytes: 2 * 1024 * 1024,
            concurrency: 5,
            skip_domains: Vec::new(),
            placeholder_domains: vec!["example.com".to_string()],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let rec_defaults = RecommendationConfig::default();
        let link_defaults = LinkConfig::default();

        let recommendation = RecommendationConfig {
            scholarship_count: parse_env("SCHOLARSHIP_COUNT", rec_defaults.scholarship_count)?,
            target_year: parse_env("SCHOLARSHIP_TARGET_YEAR", rec_defaults.target_year)?,
            max_tokens: parse_env("LLM_MAX_TOKENS", rec_defaults.max_tokens)?,
            temperature: parse_env("LLM_TEMPERATURE", rec_defaults.temperature)?,
            generation_timeout: Duration::from_secs(parse_env(
                "LLM_TIMEOUT_SECS",
                rec_defaults.generation_timeout.as_secs(),
            )?),
            overlapping_display_count: parse_env(
                "OVERLAPPING_DISPLAY_COUNT",
                rec_defaults.overlapping_display_count,
            )?,
        };

        let links = LinkConfig {
            enabled: parse_env("LINK_RESOLUTION_ENABLED", link_defaults.enabled)?,
            page_timeout: Duration::from_secs(parse_env(
                "LINK_RESOLUTION_TIMEOUT_SECS",
                link_defaults.page_timeout.as_secs(),
            )?),
            max_page_bytes: parse_env("LINK_MAX_PAGE_BYTES", link_defaults.max_page_bytes)?,
            concurrency: parse_env("LINK_RESOLUTION_CONCURRENCY", link_defaults.concurrency)?
                .max(1),
            skip_domains: list_env("LINK_SKIP_DOMAINS").unwrap_or(link_defaults.skip_domains),
            placeholder_domains: list_env("LINK_PLACEHOLDER_DOMAINS")
                .unwrap_or(link_defaults.placeholder_domains),
        };

        let required_profile_fields = match list_env("REQUIRED_PROFILE_FIELDS") {
            Some(names) => names
                .iter()
                .map(|name| {
                    name.parse::<ProfileField>()
                        .map_err(|e| anyhow::anyhow!("REQUIRED_PROFILE_FIELDS: {e}"))
                })
                .collect::<Result<Vec<_>>>()?,
            None => ProfileField::default_required().to_vec(),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            jwt_secret: require_env("JWT_SECRET")?,
            jwt_ttl_secs: parse_env("JWT_TTL_SECS", 3600)?,
            port: parse_env("PORT", 3001)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            recommendation,
            links,
            required_profile_fields,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Comma-separated list. Returns `None` when the variable is unset so the
/// caller can fall back to its default; an empty value yields an empty list.
fn list_env(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|raw| split_list(&raw))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

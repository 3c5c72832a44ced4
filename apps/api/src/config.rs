use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// How the current user is identified for tracking and profile storage.
/// Chosen once at startup; there is no runtime fallback between strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// HS256 bearer tokens signed with `JWT_SECRET`.
    Jwt { secret: String },
    /// Every request is anonymous.
    Anonymous,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Optional so the server can start without it; generation then fails
    /// with a configuration error.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation_timeout_secs: u64,
    pub artifacts_dir: PathBuf,
    pub bullet_limit: usize,
    pub latex_local_timeout_secs: u64,
    pub latex_container_timeout_secs: u64,
    pub latex_docker_image: String,
    pub identity: IdentityStrategy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.5-flash"),
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            generation_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", 120)?,
            artifacts_dir: PathBuf::from(env_or("ARTIFACTS_DIR", "artifacts")),
            bullet_limit: parse_env("BULLET_LIMIT", 12)?,
            latex_local_timeout_secs: parse_env("LATEX_LOCAL_TIMEOUT_SECS", 120)?,
            latex_container_timeout_secs: parse_env("LATEX_CONTAINER_TIMEOUT_SECS", 240)?,
            latex_docker_image: env_or("LATEX_DOCKER_IMAGE", "blang/latex:ctanfull"),
            identity: identity_strategy(
                &env_or("IDENTITY_STRATEGY", "anonymous"),
                optional_env("JWT_SECRET"),
            )?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn identity_strategy(name: &str, jwt_secret: Option<String>) -> Result<IdentityStrategy> {
    match name.trim().to_ascii_lowercase().as_str() {
        "jwt" => {
            let secret = jwt_secret
                .context("IDENTITY_STRATEGY=jwt requires JWT_SECRET to be set")?;
            Ok(IdentityStrategy::Jwt { secret })
        }
        "anonymous" => Ok(IdentityStrategy::Anonymous),
        other => bail!("Unknown IDENTITY_STRATEGY '{other}' (expected 'jwt' or 'anonymous')"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

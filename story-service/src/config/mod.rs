use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use validator::Validate;

/// Default upper bound on generated tokens.
const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default outbound request timeout, in seconds.
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct StoryConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub provider: ProviderConfig,
    pub generation: GenerationSettings,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" | "test" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            other => Err(format!("Unknown environment '{}'", other)),
        }
    }
}

/// Which text-generation backend serves story requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Cohere,
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Cohere => "cohere",
            ProviderKind::Mock => "mock",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Cohere => "command",
            ProviderKind::Mock => "mock",
        }
    }

    /// Environment variable holding the provider credential, if one is needed.
    fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GOOGLE_API_KEY"),
            ProviderKind::Cohere => Some("COHERE_API_KEY"),
            ProviderKind::Mock => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "cohere" => Ok(ProviderKind::Cohere),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!(
                "Unknown story provider '{}' (expected gemini, cohere or mock)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Secret<String>,
    pub model: String,
    /// Overrides the provider's public API base URL.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

/// Generation knobs forwarded to the provider on every call.
#[derive(Debug, Clone, Validate)]
pub struct GenerationSettings {
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: u32,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// `*` mirrors any request origin.
    pub allowed_origins: Vec<String>,
}

impl StoryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let kind: ProviderKind = get_env("STORY_PROVIDER", Some("gemini"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let api_key = match kind.api_key_var() {
            Some(var) => get_env(var, None, is_prod)?,
            None => String::new(),
        };

        let generation = GenerationSettings {
            max_tokens: parse_env(
                "STORY_MAX_TOKENS",
                &DEFAULT_MAX_TOKENS.to_string(),
                is_prod,
            )?,
            temperature: parse_env(
                "STORY_TEMPERATURE",
                &DEFAULT_TEMPERATURE.to_string(),
                is_prod,
            )?,
        };
        generation.validate().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid generation settings: {}", e))
        })?;

        Ok(StoryConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("story-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            provider: ProviderConfig {
                kind,
                api_key: Secret::new(api_key),
                model: get_env("STORY_MODEL", Some(kind.default_model()), is_prod)?,
                base_url: optional_env("STORY_PROVIDER_BASE_URL"),
                timeout_secs: parse_env(
                    "STORY_PROVIDER_TIMEOUT_SECS",
                    &DEFAULT_PROVIDER_TIMEOUT_SECS.to_string(),
                    is_prod,
                )?,
            },
            generation,
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        })
    }
}

/// Split a comma-separated origin list, dropping blanks. An empty list means
/// any origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, Some(default), is_prod)?;
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

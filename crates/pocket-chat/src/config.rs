use std::env;
use std::fmt::{self, Debug, Display};
use std::time::Duration;

use pocket_chat_hf_model::{HfConfig, HfConfigBuilder};
use pocket_chat_model::{InvalidModelError, ModelCatalog};

const API_TOKEN_VAR: &str = "HF_API_TOKEN";
const BASE_URL_VAR: &str = "HF_BASE_URL";
const MODEL_VAR: &str = "HF_MODEL";
const TIMEOUT_VAR: &str = "HF_TIMEOUT_SECS";
const MODELS_VAR: &str = "POCKET_CHAT_MODELS";

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidTimeout(String),
    InvalidCatalog(InvalidModelError),
    UnknownModel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => {
                write!(f, "{name} environment variable is not set")
            }
            ConfigError::InvalidTimeout(value) => write!(
                f,
                "{TIMEOUT_VAR} must be a positive number of seconds, got `{value}`"
            ),
            ConfigError::InvalidCatalog(err) => {
                write!(f, "{MODELS_VAR} is invalid: {err}")
            }
            ConfigError::UnknownModel(model) => {
                write!(f, "{MODEL_VAR} `{model}` is not in the model catalog")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings read from the environment at startup.
pub struct AppConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    /// The model preselected by the environment, if any.
    pub model: Option<String>,
    pub catalog: ModelCatalog,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty())
        };

        let api_key = lookup(API_TOKEN_VAR)
            .ok_or(ConfigError::MissingVar(API_TOKEN_VAR))?;

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(value)),
            },
            None => None,
        };

        let catalog = match lookup(MODELS_VAR) {
            Some(models) => ModelCatalog::new(models.split(','))
                .map_err(ConfigError::InvalidCatalog)?,
            None => ModelCatalog::default(),
        };

        let model = match lookup(MODEL_VAR) {
            Some(model) => Some(
                catalog
                    .select(&model)
                    .ok_or(ConfigError::UnknownModel(model.clone()))?
                    .to_owned(),
            ),
            None => None,
        };

        Ok(Self {
            api_key,
            base_url: lookup(BASE_URL_VAR),
            timeout,
            model,
            catalog,
        })
    }

    pub fn hf_config(&self) -> HfConfig {
        let mut builder = HfConfigBuilder::with_api_key(&self.api_key);
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.with_timeout(timeout);
        }
        builder.build()
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("catalog", &self.catalog)
            .finish()
    }
}

//! Runtime configuration, read once at startup and passed down explicitly.

pub const DEFAULT_STORE_BASE_URL: &str = "https://api.jsonbin.io/v3";

const ENV_BIN_ID: &str = "JSONBIN_BIN_ID";
const ENV_API_KEY: &str = "JSONBIN_API_KEY";
const ENV_BASE_URL: &str = "JSONBIN_BASE_URL";
const ENV_EDIT_PASSWORD: &str = "EDIT_PASSWORD";
const ENV_HOST: &str = "HOST";
const ENV_PORT: &str = "PORT";

/// Errors that stop the server from starting at all.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535 (got '{0}')")]
    InvalidPort(String),
}

/// Where the leaderboard document lives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreConfig {
    pub base_url: String,
    pub bin_id: Option<String>,
    pub api_key: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_BASE_URL.to_string(),
            bin_id: None,
            api_key: None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub edit_password: Option<String>,
}

impl AppConfig {
    /// Build from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map here). Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(ENV_PORT) {
            Some(p) => match p.parse::<u16>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidPort(p)),
            },
            None => default_port(),
        };

        Ok(Self {
            host: get(ENV_HOST).unwrap_or_else(default_host),
            port,
            store: StoreConfig {
                base_url: get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_STORE_BASE_URL.to_string()),
                bin_id: get(ENV_BIN_ID),
                api_key: get(ENV_API_KEY),
            },
            // Not trimmed: the secret is compared byte for byte.
            edit_password: lookup(ENV_EDIT_PASSWORD).filter(|v| !v.is_empty()),
        })
    }

    /// Names of settings that are required for full operation but unset.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store.bin_id.is_none() {
            missing.push(ENV_BIN_ID);
        }
        if self.store.api_key.is_none() {
            missing.push(ENV_API_KEY);
        }
        if self.edit_password.is_none() {
            missing.push(ENV_EDIT_PASSWORD);
        }
        missing
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

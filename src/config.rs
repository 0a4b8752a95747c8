use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://scores.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}

/// Store settings, read from the environment (and a `.env` file if present).
/// The bind address and port are left to Rocket's own configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(
            dotenv::var("DATABASE_URL").ok(),
            dotenv::var("DATABASE_MAX_CONNECTIONS").ok(),
        )
    }

    fn from_vars(
        database_url: Option<String>,
        max_connections: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            config.database_url = url;
        }

        if let Some(value) = max_connections {
            config.max_connections = match value.trim().parse::<u32>() {
                Ok(number) if number > 0 => number,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "DATABASE_MAX_CONNECTIONS",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }

    #[cfg(test)]
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

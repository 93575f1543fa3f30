use std::time::Duration;

use crate::credentials::ModzyCredentials;

pub const DEFAULT_ENDPOINT: &str = "https://app.modzy.com/api/";
pub const BASE_URL_ENV: &str = "MODZY_BASE_URL";

/// Configuration for the [Client](crate::Client). Can be created using [ClientConfigBuilder], which is created using the [ClientConfig::builder] method.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The endpoint of the Modzy API, e.g. `https://app.modzy.com/api/`
    pub endpoint: String,
    /// Credentials used to authorize every request
    pub credentials: ModzyCredentials,
    /// Per request timeout. `None` leaves reqwest's default in place.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new [ClientConfigBuilder] with the given credentials.
    pub fn builder(credentials: ModzyCredentials) -> ClientConfigBuilder {
        ClientConfigBuilder::new(credentials)
    }

    /// Reads the api key from `MODZY_API_KEY` and, when set, the endpoint from `MODZY_BASE_URL`.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let mut builder = Self::builder(ModzyCredentials::from_env()?);
        if let Ok(endpoint) = std::env::var(BASE_URL_ENV) {
            builder = builder.with_endpoint(endpoint);
        }
        Ok(builder.build())
    }
}

/// Builder for the ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub(crate) fn new(credentials: ModzyCredentials) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig {
                endpoint: DEFAULT_ENDPOINT.into(),
                credentials,
                request_timeout: None,
                user_agent: concat!("modzy-rust/", env!("CARGO_PKG_VERSION")).into(),
            },
        }
    }

    /// Set the endpoint of the Modzy API
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> ClientConfigBuilder {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the timeout applied to each individual request
    pub fn with_request_timeout(mut self, timeout: Duration) -> ClientConfigBuilder {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> ClientConfigBuilder {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the ClientConfig
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

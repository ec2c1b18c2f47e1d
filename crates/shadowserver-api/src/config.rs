// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Credentials and configuration handling

use crate::error::{Result, ShadowserverError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, time::Duration};
use url::Url;
use zeroize::Zeroizing;

/// Base URL of the public Shadowserver API.
pub const DEFAULT_API_URL: &str = "https://transform.shadowserver.org/api2/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Prefix of the environment variables read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "SHADOWSERVER";

/// Everything needed to sign and address a request.
///
/// The key travels with every request body, the secret is only used to
/// derive the signature and never leaves the process.
#[derive(Clone)]
pub struct ApiCredentials {
    base_url: Url,
    api_key: String,
    api_secret: Zeroizing<Vec<u8>>,
}

impl ApiCredentials {
    /// Creates credentials for the API at `base_url`.
    ///
    /// Endpoint paths are appended verbatim to `base_url`, so it normally ends
    /// with a `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the key or secret is empty.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = Zeroizing::new(api_secret.into().into_bytes());

        if api_key.is_empty() {
            return Err(ShadowserverError::InvalidParameter(
                "API key must not be empty".into(),
            ));
        }
        if api_secret.is_empty() {
            return Err(ShadowserverError::InvalidParameter(
                "API secret must not be empty".into(),
            ));
        }

        Ok(Self {
            base_url: Url::parse(base_url)?,
            api_key,
            api_secret,
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.api_secret
    }

    /// `{base_url}{endpoint}`
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{endpoint}", self.base_url))?)
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Client settings as read from a file and the environment.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL
    pub api_url: String,
    /// API key
    pub api_key: String,
    /// API secret
    pub api_secret: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Loads the configuration.
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. the defaults
    /// 2. the file at `path`, if given (format chosen by extension)
    /// 3. `SHADOWSERVER_API_URL`, `SHADOWSERVER_API_KEY`, `SHADOWSERVER_API_SECRET`,
    ///    `SHADOWSERVER_TIMEOUT_SECS`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// The credentials described by this configuration.
    pub fn credentials(&self) -> Result<ApiCredentials> {
        ApiCredentials::new(&self.api_url, &self.api_key, &self.api_secret)
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Harness configuration
//
// Layered with figment: defaults, then an optional JSON file, then `ATH_*`
// environment variables named after the fields. Time values are scaled by
// the elastic factor so slow CI hosts can stretch every budget at once.

use crate::controller::STARTUP_TIMEOUT;
use crate::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Prefix of environment variables overriding configuration fields
pub const ENV_PREFIX: &str = "ATH_";
/// Path of a JSON configuration file to load before env overrides
pub const CONFIG_PATH_ENV: &str = "ATH_CONFIG";
/// URL of an already running application under test
pub const URL_ENV: &str = "ATH_URL";
/// Startup timeout in seconds
pub const STARTUP_TIMEOUT_ENV: &str = "ATH_STARTUP_TIMEOUT_SECS";
/// Multiplier applied to timeouts and settle delays
pub const ELASTIC_FACTOR_ENV: &str = "ATH_ELASTIC_FACTOR";
/// Name of the response header carrying the application version
pub const VERSION_HEADER_ENV: &str = "ATH_VERSION_HEADER";

/// Header the application sends on every response: `"<version> <build-info>"`
pub const DEFAULT_VERSION_HEADER: &str = "X-Jenkins";

/// Settings shared by every page object of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Address of an already running application, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    /// Budget for the application to come back after a restart (seconds)
    pub startup_timeout_secs: u64,

    /// Pause between observations of polled waits (milliseconds)
    pub poll_interval_ms: u64,

    /// Fixed pause after same-page UI mutations (milliseconds)
    pub settle_delay_ms: u64,

    /// Multiplier applied to startup timeout and settle delay
    pub elastic_factor: f64,

    /// Response header identifying the application and its version
    pub version_header: String,

    /// Timeout for plain HTTP probes (milliseconds)
    pub http_timeout_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            url: None,
            startup_timeout_secs: STARTUP_TIMEOUT.as_secs(),
            poll_interval_ms: 100,
            settle_delay_ms: 100,
            elastic_factor: 1.0,
            version_header: DEFAULT_VERSION_HEADER.to_string(),
            http_timeout_ms: 10_000,
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the file named by `ATH_CONFIG` (if set) under `ATH_*` overrides.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load(path.as_deref())
    }

    /// Layers defaults, the JSON file at `path` and `ATH_*` variables.
    ///
    /// Each variable overrides the field of the same name, e.g.
    /// `ATH_POLL_INTERVAL_MS=250` sets `poll_interval_ms`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Self::defaults();
        if let Some(path) = path {
            figment = figment.merge(Json::file(existing(path)?));
        }
        let env = Env::prefixed(ENV_PREFIX).ignore(&["config"]);
        Self::extract(figment.merge(env))
    }

    /// Reads a JSON configuration file. Missing keys take default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = existing(path.as_ref())?;
        Self::extract(Self::defaults().merge(Json::file(path)))
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the address of an already running application
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Sets the elastic factor
    pub fn elastic_factor(mut self, factor: f64) -> Self {
        self.elastic_factor = factor;
        self
    }

    /// Sets the startup timeout (seconds)
    pub fn startup_timeout_secs(mut self, secs: u64) -> Self {
        self.startup_timeout_secs = secs;
        self
    }

    /// Sets the settle delay (milliseconds)
    pub fn settle_delay_ms(mut self, millis: u64) -> Self {
        self.settle_delay_ms = millis;
        self
    }

    /// Sets the poll interval (milliseconds)
    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.elastic_factor.is_finite() || self.elastic_factor <= 0.0 {
            return Err(Error::Config(format!(
                "elastic factor must be a positive number, got {}",
                self.elastic_factor
            )));
        }
        if self.startup_timeout_secs == 0 {
            return Err(Error::Config("startup timeout must not be zero".to_string()));
        }
        if self.version_header.trim().is_empty() {
            return Err(Error::Config("version header must not be empty".to_string()));
        }
        Ok(())
    }

    /// Scales `duration` by the elastic factor.
    pub fn elastic(&self, duration: Duration) -> Duration {
        let nanos = duration.as_nanos() as f64 * self.elastic_factor;
        Duration::from_nanos(nanos.round() as u64)
    }

    /// Restart wait budget, scaled.
    pub fn startup_timeout(&self) -> Duration {
        self.elastic(Duration::from_secs(self.startup_timeout_secs))
    }

    /// Fixed post-action settle delay, scaled.
    pub fn settle_delay(&self) -> Duration {
        self.elastic(Duration::from_millis(self.settle_delay_ms))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

// figment skips missing files; an explicitly named one must exist.
fn existing(path: &Path) -> Result<&Path> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::Config(format!(
            "configuration file {} not found",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.startup_timeout(), STARTUP_TIMEOUT);
        assert_eq!(config.settle_delay(), Duration::from_millis(100));
        assert_eq!(config.version_header, "X-Jenkins");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env(URL_ENV, "http://localhost:8080/jenkins/");
            jail.set_env(STARTUP_TIMEOUT_ENV, "60");
            jail.set_env(ELASTIC_FACTOR_ENV, "2.5");
            jail.set_env("ATH_POLL_INTERVAL_MS", "250");

            let config = HarnessConfig::load(None).expect("overrides should apply");
            assert_eq!(
                config.url.as_ref().map(Url::as_str),
                Some("http://localhost:8080/jenkins/")
            );
            assert_eq!(config.startup_timeout(), Duration::from_secs(150));
            assert_eq!(config.settle_delay(), Duration::from_millis(250));
            assert_eq!(config.poll_interval(), Duration::from_millis(250));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env(ELASTIC_FACTOR_ENV, "0");
            let bad_factor = HarnessConfig::load(None);
            assert!(matches!(bad_factor, Err(Error::Config(_))));

            jail.set_env(ELASTIC_FACTOR_ENV, "1.5");
            jail.set_env(STARTUP_TIMEOUT_ENV, "soon");
            let bad_number = HarnessConfig::load(None);
            assert!(matches!(bad_number, Err(Error::Config(_))));

            jail.set_env(STARTUP_TIMEOUT_ENV, "60");
            jail.set_env(URL_ENV, "not a url");
            let bad_url = HarnessConfig::load(None);
            assert!(matches!(bad_url, Err(Error::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_env_wins_over_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "harness.json",
                r#"{ "settle_delay_ms": 250, "elastic_factor": 2.0 }"#,
            )?;
            jail.set_env(CONFIG_PATH_ENV, "harness.json");
            jail.set_env(ELASTIC_FACTOR_ENV, "3");

            let config = HarnessConfig::from_env().expect("config should load");
            assert_eq!(config.elastic_factor, 3.0);
            assert_eq!(config.settle_delay(), Duration::from_millis(750));
            Ok(())
        });
    }

    #[test]
    fn test_from_file_fills_missing_keys() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "harness.json",
                r#"{ "settle_delay_ms": 250, "elastic_factor": 2.0 }"#,
            )?;
            // files alone ignore the environment
            jail.set_env(ELASTIC_FACTOR_ENV, "3");

            let config = HarnessConfig::from_file("harness.json").expect("config should load");
            assert_eq!(config.settle_delay(), Duration::from_millis(500));
            assert_eq!(config.poll_interval(), Duration::from_millis(100));
            assert_eq!(config.url, None);
            Ok(())
        });
    }

    #[test]
    fn test_from_file_reports_path() {
        let err = HarnessConfig::from_file("/nonexistent/harness.json")
            .expect_err("missing file should fail");
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("/nonexistent/harness.json"));
    }
}

// Context - Shared services for every page object of a session
//
// Holds the browser driver, the harness configuration, the HTTP header probe
// and the page registry. Page objects keep only a weak handle to it; the
// session owns the strong one.

use crate::config::HarnessConfig;
use crate::driver::Driver;
use crate::error::Result;
use crate::http::{HeaderProbe, HttpHeaderProbe};
use crate::page::PageObject;
use crate::registry::PageRegistry;
use std::fmt;
use std::sync::Arc;

/// Injection context shared by page objects.
pub struct Context {
    driver: Arc<dyn Driver>,
    config: HarnessConfig,
    header_probe: Arc<dyn HeaderProbe>,
    registry: PageRegistry,
}

impl Context {
    /// Starts building a context around `driver`.
    pub fn builder(driver: Arc<dyn Driver>) -> ContextBuilder {
        ContextBuilder {
            driver,
            config: HarnessConfig::default(),
            header_probe: None,
            registry: PageRegistry::new(),
        }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn header_probe(&self) -> &Arc<dyn HeaderProbe> {
        &self.header_probe
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Builder for [`Context`].
pub struct ContextBuilder {
    driver: Arc<dyn Driver>,
    config: HarnessConfig,
    header_probe: Option<Arc<dyn HeaderProbe>>,
    registry: PageRegistry,
}

impl ContextBuilder {
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default reqwest-based header probe.
    pub fn header_probe(mut self, probe: Arc<dyn HeaderProbe>) -> Self {
        self.header_probe = Some(probe);
        self
    }

    /// Registers `T` for items of `kind`. See [`PageRegistry::register`].
    pub fn register<T: PageObject>(self, kind: &str) -> Result<Self> {
        self.registry.register::<T>(kind)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Arc<Context>> {
        self.config.validate()?;
        let header_probe: Arc<dyn HeaderProbe> = match self.header_probe {
            Some(probe) => probe,
            None => Arc::new(HttpHeaderProbe::new(self.config.http_timeout())?),
        };

        Ok(Arc::new(Context {
            driver: self.driver,
            config: self.config,
            header_probe,
            registry: self.registry,
        }))
    }
}

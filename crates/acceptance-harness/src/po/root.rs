// Root page - Entry point to the application under test
//
// The only page object a session creates directly. Everything else is
// resolved from here.

use crate::driver::By;
use crate::error::{Error, Result};
use crate::page::{PageBase, PageObject};
use crate::po::collections::Collection;
use crate::po::config::{ConfigPage, ToolConfigPage};
use crate::resolver::{resolve_plugin_page, resolve_relative};
use crate::version::Version;
use crate::wait::{RESTART_TOLERANCE, Wait};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Text of the transitional page shown while the application restarts
pub const PLEASE_WAIT: &str = "Please wait";

/// The application's home page.
#[derive(Debug)]
pub struct RootPage {
    base: PageBase,
    version: OnceCell<Version>,
    pub jobs: Collection,
    pub views: Collection,
    pub agents: Collection,
}

impl PageObject for RootPage {
    fn from_base(base: PageBase) -> Self {
        Self {
            jobs: Collection::jobs(base.clone()),
            views: Collection::views(base.clone()),
            agents: Collection::agents(base.clone()),
            version: OnceCell::new(),
            base,
        }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

impl RootPage {
    /// Version of the application, read once from the version header.
    ///
    /// Fails with [`Error::NotTheSut`] if the root address does not send the
    /// header.
    pub async fn version(&self) -> Result<&Version> {
        self.version
            .get_or_try_init(|| async {
                let context = self.base.context()?;
                let header = context.config().version_header.as_str();
                let value = context
                    .header_probe()
                    .header(self.base.url(), header)
                    .await?
                    .ok_or_else(|| Error::NotTheSut {
                        url: self.base.url().to_string(),
                        header: header.to_string(),
                    })?;
                let version = Version::from_header(&value)?;
                tracing::debug!("Application under test reports version {}", version);
                Ok(version)
            })
            .await
    }

    /// `true` if the application is `min` or newer.
    pub async fn is_at_least(&self, min: &str) -> Result<bool> {
        let min: Version = min.parse()?;
        Ok(self.version().await?.is_at_least(&min))
    }

    pub fn config_page(&self) -> Result<ConfigPage> {
        resolve_relative(&self.base, "configure")
    }

    pub fn tool_config_page(&self) -> Result<ToolConfigPage> {
        resolve_relative(&self.base, "configureTools/")
    }

    /// Plugin page `T`, mounted at `plugin/<fragment>/`.
    pub fn plugin_page<T: PageObject>(&self) -> Result<T> {
        resolve_plugin_page(&self.base.context()?, &self.base)
    }

    pub async fn login(&self) -> Result<()> {
        self.base.visit("login").await
    }

    pub async fn logout(&self) -> Result<()> {
        self.base.visit("logout").await
    }

    /// `true` if the application offers to restart itself.
    ///
    /// Depends on how the application was launched; tests that restart
    /// should skip themselves when this is `false`.
    pub async fn can_restart(&self) -> Result<bool> {
        self.base.visit("restart").await?;
        Ok(self.base.try_find(&By::button("Yes")).await?.is_some())
    }

    /// Restarts the application and waits for it to serve real pages again.
    pub async fn restart(&self) -> Result<()> {
        let timeout = self.base.context()?.config().startup_timeout();
        self.restart_within(timeout).await
    }

    /// Like [`restart`](Self::restart) with an explicit time budget.
    ///
    /// Tolerates the transitional page and no page at all; any other failure
    /// ends the wait.
    pub async fn restart_within(&self, timeout: Duration) -> Result<()> {
        let poll_interval = self.base.context()?.config().poll_interval();

        self.base.visit("restart").await?;
        self.base.click_button("Yes").await?;

        // A refused navigation leaves the browser on its own error page, so
        // every observation goes back to the root rather than reloading.
        let base = &self.base;
        let target = base.url();
        Wait::new("the application to restart")
            .with_timeout(timeout)
            .with_poll_interval(poll_interval)
            .ignoring(RESTART_TOLERANCE)
            .until(move || async move {
                base.driver()
                    .navigate(target)
                    .await
                    .map_err(no_page_served)?;
                base.assert_no_content(PLEASE_WAIT).await
            })
            .await?;

        tracing::debug!("Application under test is back at {}", self.base.url());
        Ok(())
    }
}

/// A refused connection while restarting means no page is served yet.
fn no_page_served(err: Error) -> Error {
    match err {
        Error::Navigation { url, message } => {
            Error::ElementNotFound(format!("no page served at {url} ({message})"))
        }
        other => other,
    }
}

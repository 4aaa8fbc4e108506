// Session - Owns the context and the root page for the lifetime of a test

use crate::context::Context;
use crate::controller::{ExternalSut, SutController};
use crate::error::{Error, Result};
use crate::page::PageObject;
use crate::po::RootPage;
use crate::resolver::resolve_url;
use std::sync::Arc;

/// One test's view of the application under test.
///
/// Dropping the session drops the context; page objects that outlive it fail
/// with [`Error::ContextDropped`] when they need it.
#[derive(Debug)]
pub struct Session {
    context: Arc<Context>,
    root: RootPage,
}

impl Session {
    /// Starts the application through `controller` and attaches to it.
    ///
    /// The version header is checked right away, so a wrong address fails
    /// here rather than in the middle of a test.
    pub async fn start<C>(controller: &mut C, context: Arc<Context>) -> Result<Self>
    where
        C: SutController + ?Sized,
    {
        controller.start().await.map_err(Error::Startup)?;
        let url = controller.url();
        tracing::debug!("Attaching to application under test at {}", url);

        let root: RootPage = resolve_url(&context, url)?;
        root.version().await?;
        Ok(Self { context, root })
    }

    /// Attaches to the already running application at the configured URL.
    pub async fn external(context: Arc<Context>) -> Result<Self> {
        let url = context.config().url.clone().ok_or_else(|| {
            Error::Config(format!(
                "no application URL configured (set {})",
                crate::config::URL_ENV
            ))
        })?;
        let mut controller = ExternalSut::new(url);
        Self::start(&mut controller, context).await
    }

    pub fn root(&self) -> &RootPage {
        &self.root
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Browser address of the root page.
    pub fn url(&self) -> &url::Url {
        self.root.url()
    }
}

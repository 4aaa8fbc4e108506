//! acceptance-harness: Page objects and waits for browser-driven acceptance tests
//!
//! Tests talk to the application under test through page objects, one per
//! screen. Page objects are resolved from a shared [`Context`] and an address;
//! operations whose effect is not immediately visible (a restart, a build, a
//! form that adds a block) poll the application with a [`Wait`].
//!
//! # Examples
//!
//! ## Attaching to a running application
//!
//! ```ignore
//! use acceptance_harness::{Context, HarnessConfig, PlaywrightDriver, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarnessConfig::from_env()?;
//!     let driver = Arc::new(PlaywrightDriver::launch(true).await?);
//!     let context = Context::builder(driver).config(config).build()?;
//!
//!     let session = Session::external(context).await?;
//!     let root = session.root();
//!     println!("Testing version {}", root.version().await?);
//!
//!     if root.can_restart().await? {
//!         root.restart().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Plugin pages and tool installations
//!
//! ```ignore
//! use acceptance_harness::page::{AreaBase, PageArea, PageBase, PageDescriptor, PageObject};
//!
//! struct GitPluginPage {
//!     base: PageBase,
//! }
//!
//! impl PageObject for GitPluginPage {
//!     const DESCRIPTOR: PageDescriptor = PageDescriptor::plugin("git");
//!
//!     fn from_base(base: PageBase) -> Self {
//!         Self { base }
//!     }
//!
//!     fn base(&self) -> &PageBase {
//!         &self.base
//!     }
//! }
//!
//! struct MavenInstallation {
//!     area: AreaBase,
//! }
//!
//! impl PageArea for MavenInstallation {
//!     const DESCRIPTOR: PageDescriptor = PageDescriptor::tool("Maven");
//!
//!     fn from_area(area: AreaBase) -> Self {
//!         Self { area }
//!     }
//!
//!     fn area(&self) -> &AreaBase {
//!         &self.area
//!     }
//! }
//!
//! // plugin/git/ below the root
//! let git: GitPluginPage = root.plugin_page()?;
//!
//! // clicks "Add Maven", then reads the new block's path prefix
//! let tools = root.tool_config_page()?;
//! let maven: MavenInstallation = tools.add_tool().await?;
//! maven.area().fill("name", "maven-3").await?;
//! tools.save().await?;
//! ```

// Test doubles (exposed for integration tests)
#[doc(hidden)]
pub mod testing;

pub mod config;
pub mod context;
pub mod controller;
pub mod driver;
mod error;
pub mod http;
pub mod page;
pub mod po;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod version;
pub mod wait;

// Re-export error types
pub use error::{Error, FailureKind, ResolutionError, Result};

// Re-export the session entry points
pub use config::HarnessConfig;
pub use context::{Context, ContextBuilder};
pub use controller::{ExternalSut, STARTUP_TIMEOUT, SutController};
pub use session::Session;

// Re-export page object building blocks
pub use page::{AreaBase, PageArea, PageBase, PageDescriptor, PageObject};
pub use registry::{DynPage, PageRegistry};

// Re-export browser driver types
pub use driver::{By, Driver, Element};
#[cfg(feature = "playwright")]
pub use driver::PlaywrightDriver;

// Re-export synchronization
pub use wait::{Outcome, Wait};

pub use version::Version;

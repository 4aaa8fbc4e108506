// Resolver - Constructs page objects from types and addresses
//
// Resolution is structural: a page type is built from the shared context and
// an address, or from its owning page and a path prefix. Addresses derived
// from declarative metadata (plugin mount fragments, tool names) are computed
// here, before anything touches the browser.

use crate::context::Context;
use crate::driver::By;
use crate::error::{ResolutionError, Result};
use crate::page::{AreaBase, PageArea, PageBase, PageObject};
use crate::po::ToolConfigPage;
use std::sync::Arc;
use url::Url;

/// Suffix of the path attribute on a tool block's delete button
const DELETE_CONTROL_SUFFIX: &str = "/repeatable-delete";

/// Resolves `T` at an absolute `address`.
///
/// No I/O happens. The page keeps `address` as given and shares `context`.
pub fn resolve<T: PageObject>(context: &Arc<Context>, address: &str) -> Result<T> {
    let url = Url::parse(address)
        .map_err(|_| ResolutionError::InvalidAddress(address.to_string()))?;
    resolve_url(context, url)
}

/// Resolves `T` at an already parsed absolute URL.
pub fn resolve_url<T: PageObject>(context: &Arc<Context>, url: Url) -> Result<T> {
    if url.cannot_be_a_base() {
        return Err(ResolutionError::InvalidAddress(url.to_string()).into());
    }
    tracing::trace!("Resolving {} at {}", std::any::type_name::<T>(), url);
    Ok(T::from_base(PageBase::new(context, url)))
}

/// Resolves `T` at `rel`, relative to `parent`'s address.
pub fn resolve_relative<T: PageObject>(parent: &PageBase, rel: &str) -> Result<T> {
    let context = parent.context()?;
    resolve_url(&context, parent.url_for(rel)?)
}

/// Resolves the page part `T` living on `parent` under `prefix`.
pub fn resolve_child<T: PageArea>(parent: &PageBase, prefix: impl Into<String>) -> T {
    T::from_area(AreaBase::new(parent.clone(), prefix))
}

/// Resolves a plugin page at `plugin/<fragment>/` below `root`.
///
/// Fails with [`ResolutionError::MissingMountFragment`] if `T` declares no
/// fragment.
pub fn resolve_plugin_page<T: PageObject>(context: &Arc<Context>, root: &PageBase) -> Result<T> {
    let fragment = T::DESCRIPTOR
        .mount_fragment
        .ok_or(ResolutionError::MissingMountFragment {
            page: std::any::type_name::<T>(),
        })?;
    T::DESCRIPTOR.validate(std::any::type_name::<T>())?;

    let url = root.url_for(&format!("plugin/{fragment}/"))?;
    resolve_url(context, url)
}

/// Adds a new instance of tool `T` on the tool configuration screen and
/// resolves the block the application created for it.
///
/// The pause after clicking "Add" is a fixed settle delay, not a polled wait.
/// A missing delete button surfaces as the driver's element-not-found error.
pub async fn resolve_installed_tool<T: PageArea>(tool_config: &ToolConfigPage) -> Result<T> {
    let name = T::DESCRIPTOR
        .tool_name
        .ok_or(ResolutionError::MissingToolName {
            page: std::any::type_name::<T>(),
        })?;
    T::DESCRIPTOR.validate(std::any::type_name::<T>())?;

    let page = tool_config.base();
    let settle_delay = page.context()?.config().settle_delay();

    page.ensure_open().await?;
    page.click_button(&format!("Add {name}")).await?;
    tokio::time::sleep(settle_delay).await;

    let delete = page.find(&By::button(format!("Delete {name}"))).await?;
    let control_path = page
        .driver()
        .attribute(&delete, "path")
        .await?
        .unwrap_or_default();
    let prefix = control_path
        .strip_suffix(DELETE_CONTROL_SUFFIX)
        .ok_or_else(|| ResolutionError::UnexpectedControlPath(control_path.clone()))?;

    tracing::debug!("Installed tool '{}' at path '{}'", name, prefix);
    Ok(resolve_child(page, prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::page::PageDescriptor;
    use crate::testing::{FakeDriver, FakeHeaderProbe};

    struct Plain {
        base: PageBase,
    }

    impl PageObject for Plain {
        fn from_base(base: PageBase) -> Self {
            Self { base }
        }

        fn base(&self) -> &PageBase {
            &self.base
        }
    }

    struct Nested {
        base: PageBase,
    }

    impl PageObject for Nested {
        const DESCRIPTOR: PageDescriptor = PageDescriptor::plugin("a/b");

        fn from_base(base: PageBase) -> Self {
            Self { base }
        }

        fn base(&self) -> &PageBase {
            &self.base
        }
    }

    fn context() -> Arc<Context> {
        Context::builder(Arc::new(FakeDriver::new()))
            .header_probe(Arc::new(FakeHeaderProbe::new(None)))
            .build()
            .expect("context")
    }

    #[test]
    fn test_relative_address_is_rejected() {
        let ctx = context();
        let err = resolve::<Plain>(&ctx, "job/foo/").err().expect("relative address");
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_resolve_relative_joins_parent_address() {
        let ctx = context();
        let root: Plain = resolve(&ctx, "http://localhost:8080/jenkins/").expect("root");
        let child: Plain = resolve_relative(root.base(), "job/foo/").expect("child");
        assert_eq!(child.url().as_str(), "http://localhost:8080/jenkins/job/foo/");
    }

    #[test]
    fn test_resolve_relative_after_context_dropped() {
        let ctx = context();
        let root: Plain = resolve(&ctx, "http://localhost:8080/").expect("root");
        drop(ctx);
        assert!(matches!(
            resolve_relative::<Plain>(root.base(), "configure"),
            Err(Error::ContextDropped)
        ));
    }

    #[test]
    fn test_invalid_mount_fragment_is_rejected() {
        let ctx = context();
        let root: Plain = resolve(&ctx, "http://localhost:8080/").expect("root");
        let err = resolve_plugin_page::<Nested>(&ctx, root.base())
            .err()
            .expect("nested fragment");
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::InvalidDescriptor { .. })
        ));
    }
}

// Copyright 2026 Acceptance Harness Contributors
// Licensed under the Apache License, Version 2.0
//
// Page - Base types for page objects
//
// Every page object wraps a `PageBase` (address, context, driver) and
// implements `PageObject` by delegating to it, so concrete screens only
// declare what is specific to them. Resource-scoped parts of a page wrap an
// `AreaBase` instead: the owning page plus the form path prefix of the part.

use crate::context::Context;
use crate::driver::{By, Driver, Element};
use crate::error::{Error, ResolutionError, Result};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, Weak};
use url::Url;

/// Declarative metadata attached to a page type.
///
/// Read by the resolver when an address or UI action depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageDescriptor {
    /// Mount fragment of a plugin page (`plugin/<fragment>/`)
    pub mount_fragment: Option<&'static str>,
    /// Display name of a tool kind ("Add <name>" / "Delete <name>")
    pub tool_name: Option<&'static str>,
    /// Type identifier the application uses when creating items of this type
    pub kind: Option<&'static str>,
}

impl PageDescriptor {
    pub const NONE: Self = Self {
        mount_fragment: None,
        tool_name: None,
        kind: None,
    };

    pub const fn plugin(fragment: &'static str) -> Self {
        Self {
            mount_fragment: Some(fragment),
            ..Self::NONE
        }
    }

    pub const fn tool(name: &'static str) -> Self {
        Self {
            tool_name: Some(name),
            ..Self::NONE
        }
    }

    pub const fn kind(kind: &'static str) -> Self {
        Self {
            kind: Some(kind),
            ..Self::NONE
        }
    }

    /// Checks that every declared field is usable.
    pub fn validate(&self, page: &'static str) -> std::result::Result<(), ResolutionError> {
        let invalid = |reason: &str| ResolutionError::InvalidDescriptor {
            page,
            reason: reason.to_string(),
        };

        if let Some(fragment) = self.mount_fragment {
            if fragment.trim().is_empty() {
                return Err(invalid("mount fragment is empty"));
            }
            if fragment.contains('/') {
                return Err(invalid("mount fragment contains '/'"));
            }
        }
        if self.tool_name.is_some_and(|name| name.trim().is_empty()) {
            return Err(invalid("tool name is empty"));
        }
        if self.kind.is_some_and(|kind| kind.trim().is_empty()) {
            return Err(invalid("kind is empty"));
        }
        Ok(())
    }
}

/// State shared by all page objects: where they live and what drives them.
///
/// The context is held weakly; the session owns it.
#[derive(Clone)]
pub struct PageBase {
    url: Url,
    context: Weak<Context>,
    driver: Arc<dyn Driver>,
}

impl PageBase {
    pub fn new(context: &Arc<Context>, url: Url) -> Self {
        Self {
            url,
            context: Arc::downgrade(context),
            driver: context.driver().clone(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolves `rel` against this page's address.
    pub fn url_for(&self, rel: &str) -> Result<Url> {
        Ok(self.url.join(rel)?)
    }

    pub fn context(&self) -> Result<Arc<Context>> {
        self.context.upgrade().ok_or(Error::ContextDropped)
    }

    /// `true` if this page was resolved within `context`.
    pub fn is_in(&self, context: &Arc<Context>) -> bool {
        Weak::ptr_eq(&self.context, &Arc::downgrade(context))
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Navigates to this page.
    pub async fn open(&self) -> Result<()> {
        self.driver.navigate(&self.url).await
    }

    /// Navigates to `rel`, relative to this page.
    pub async fn visit(&self, rel: &str) -> Result<()> {
        let url = self.url_for(rel)?;
        self.driver.navigate(&url).await
    }

    /// Navigates to this page unless the browser already shows it.
    pub async fn ensure_open(&self) -> Result<()> {
        if self.driver.current_url().await? != self.url {
            self.open().await?;
        }
        Ok(())
    }

    pub async fn find(&self, by: &By) -> Result<Element> {
        self.driver.find(by).await
    }

    pub async fn try_find(&self, by: &By) -> Result<Option<Element>> {
        self.driver.try_find(by).await
    }

    pub async fn click(&self, by: &By) -> Result<()> {
        let element = self.driver.find(by).await?;
        self.driver.click(&element).await
    }

    pub async fn click_button(&self, label: &str) -> Result<()> {
        self.click(&By::button(label)).await
    }

    pub async fn fill(&self, by: &By, text: &str) -> Result<()> {
        let element = self.driver.find(by).await?;
        self.driver.fill(&element, text).await
    }

    /// `true` if the current page contains `text`.
    pub async fn has_content(&self, text: &str) -> Result<bool> {
        Ok(self.driver.page_source().await?.contains(text))
    }

    /// `true` if the current page matches `pattern`.
    pub async fn matches_content(&self, pattern: &Regex) -> Result<bool> {
        Ok(pattern.is_match(&self.driver.page_source().await?))
    }

    pub async fn assert_content(&self, text: &str) -> Result<()> {
        if self.has_content(text).await? {
            Ok(())
        } else {
            Err(Error::Unsatisfied(format!(
                "expected page to contain '{text}'"
            )))
        }
    }

    pub async fn assert_no_content(&self, text: &str) -> Result<()> {
        if self.has_content(text).await? {
            Err(Error::Unsatisfied(format!(
                "expected page not to contain '{text}'"
            )))
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for PageBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageBase")
            .field("url", &self.url.as_str())
            .field("context_alive", &(self.context.strong_count() > 0))
            .finish()
    }
}

/// A navigable screen of the application under test.
///
/// # Example
///
/// ```ignore
/// use acceptance_harness::page::{PageBase, PageDescriptor, PageObject};
///
/// struct GitPluginPage {
///     base: PageBase,
/// }
///
/// impl PageObject for GitPluginPage {
///     const DESCRIPTOR: PageDescriptor = PageDescriptor::plugin("git");
///
///     fn from_base(base: PageBase) -> Self {
///         Self { base }
///     }
///
///     fn base(&self) -> &PageBase {
///         &self.base
///     }
/// }
/// ```
pub trait PageObject: Send + Sync + Sized + 'static {
    const DESCRIPTOR: PageDescriptor = PageDescriptor::NONE;

    /// Builds the page object. Must not perform I/O.
    fn from_base(base: PageBase) -> Self;

    fn base(&self) -> &PageBase;

    fn url(&self) -> &Url {
        self.base().url()
    }
}

/// A resource-scoped part of a page, addressed by its form path prefix.
#[derive(Debug, Clone)]
pub struct AreaBase {
    page: PageBase,
    path: String,
}

impl AreaBase {
    pub fn new(page: PageBase, path: impl Into<String>) -> Self {
        Self {
            page,
            path: path.into(),
        }
    }

    /// The page this area lives on.
    pub fn page(&self) -> &PageBase {
        &self.page
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Locator of the control at `rel` inside this area.
    pub fn control(&self, rel: &str) -> By {
        if rel.is_empty() {
            By::path(self.path.clone())
        } else {
            By::path(format!("{}/{}", self.path, rel))
        }
    }

    pub async fn find(&self, rel: &str) -> Result<Element> {
        self.page.find(&self.control(rel)).await
    }

    pub async fn fill(&self, rel: &str, text: &str) -> Result<()> {
        self.page.fill(&self.control(rel), text).await
    }
}

/// A page part constructed from its owning page and a path prefix.
pub trait PageArea: Send + Sync + Sized + 'static {
    const DESCRIPTOR: PageDescriptor = PageDescriptor::NONE;

    fn from_area(area: AreaBase) -> Self;

    fn area(&self) -> &AreaBase;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_constructors() {
        assert_eq!(PageDescriptor::plugin("git").mount_fragment, Some("git"));
        assert_eq!(PageDescriptor::tool("Maven").tool_name, Some("Maven"));
        assert_eq!(PageDescriptor::kind("hudson.model.FreeStyleProject").mount_fragment, None);
        assert_eq!(PageDescriptor::default(), PageDescriptor::NONE);
    }

    #[test]
    fn test_descriptor_validation() {
        assert!(PageDescriptor::plugin("git").validate("Git").is_ok());
        assert!(PageDescriptor::NONE.validate("Plain").is_ok());
        assert!(matches!(
            PageDescriptor::plugin("a/b").validate("Nested"),
            Err(ResolutionError::InvalidDescriptor { page: "Nested", .. })
        ));
        assert!(PageDescriptor::plugin(" ").validate("Blank").is_err());
        assert!(PageDescriptor::tool("").validate("NoName").is_err());
        assert!(PageDescriptor::kind("").validate("NoKind").is_err());
    }
}

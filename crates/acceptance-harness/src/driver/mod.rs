// Driver - Browser automation boundary
//
// The harness never talks to a browser engine directly. Everything it needs
// from one is this trait: navigate, look at the current URL and markup, find
// elements, click, type, and read attributes.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::fmt;
use url::Url;

#[cfg(feature = "playwright")]
mod playwright;

#[cfg(feature = "playwright")]
pub use playwright::PlaywrightDriver;

/// How to locate an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Button (or submit/button input) with the given label
    Button(String),
    /// Link with the given text
    Link(String),
    /// Form control with the given `name` attribute
    Name(String),
    /// Form control with the given `path` attribute (form-binding path)
    Path(String),
}

impl By {
    pub fn css(selector: impl Into<String>) -> Self {
        By::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        By::XPath(expression.into())
    }

    pub fn button(label: impl Into<String>) -> Self {
        By::Button(label.into())
    }

    pub fn link(text: impl Into<String>) -> Self {
        By::Link(text.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        By::Name(name.into())
    }

    pub fn path(path: impl Into<String>) -> Self {
        By::Path(path.into())
    }

    /// Renders this locator as an engine selector string (`css=` / `xpath=`).
    pub fn to_selector(&self) -> String {
        match self {
            By::Css(css) => format!("css={css}"),
            By::XPath(xpath) => format!("xpath={xpath}"),
            By::Button(label) => {
                let label = xpath_literal(label);
                format!(
                    "xpath=//button[normalize-space(.)={label}] | \
                     //input[@type='submit' or @type='button'][@value={label}]"
                )
            }
            By::Link(text) => format!("xpath=//a[normalize-space(.)={}]", xpath_literal(text)),
            By::Name(name) => format!("css=[name={}]", css_string(name)),
            By::Path(path) => format!("css=[path={}]", css_string(path)),
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_selector())
    }
}

/// XPath has no escape sequences, so strings holding both quote kinds
/// are spliced together with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

fn css_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Handle to an element found by a [`Driver`].
///
/// The handle is the selector that matched; drivers re-resolve it on use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    selector: String,
}

impl Element {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// The single browser session shared by every page object of a test.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Loads `url` in the browser.
    async fn navigate(&self, url: &Url) -> Result<()>;

    /// Returns the URL currently displayed.
    async fn current_url(&self) -> Result<Url>;

    /// Finds the first element matching `by`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] when nothing matches.
    async fn find(&self, by: &By) -> Result<Element>;

    async fn click(&self, element: &Element) -> Result<()>;

    async fn fill(&self, element: &Element, text: &str) -> Result<()>;

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>>;

    /// Returns the markup of the current page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] when no page is being served.
    async fn page_source(&self) -> Result<String>;

    /// Like [`Driver::find`], but absence is `Ok(None)`.
    async fn try_find(&self, by: &By) -> Result<Option<Element>> {
        match self.find(by).await {
            Ok(element) => Ok(Some(element)),
            Err(Error::ElementNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_rendering() {
        assert_eq!(By::css("#main").to_selector(), "css=#main");
        assert_eq!(
            By::path("/tool/repeatable-delete").to_selector(),
            "css=[path=\"/tool/repeatable-delete\"]"
        );
        assert_eq!(By::name("name").to_selector(), "css=[name=\"name\"]");
        assert_eq!(
            By::link("Console Output").to_selector(),
            "xpath=//a[normalize-space(.)='Console Output']"
        );
        assert!(
            By::button("Yes")
                .to_selector()
                .starts_with("xpath=//button[normalize-space(.)='Yes']")
        );
    }

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("plain"), "'plain'");
        assert_eq!(xpath_literal("it's"), "\"it's\"");
        assert_eq!(
            xpath_literal("say \"it's\""),
            "concat('say \"it', \"'\", 's\"')"
        );
    }
}

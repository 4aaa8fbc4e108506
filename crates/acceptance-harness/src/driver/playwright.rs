// Playwright-backed driver
//
// Maps the harness driver boundary onto a single playwright-rs page.
// Element handles are selectors; every action re-resolves them through a
// fresh locator, which is what Playwright expects anyway.

use super::{By, Driver, Element};
use crate::error::{Error, Result};
use async_trait::async_trait;
use playwright_rs::{Browser, LaunchOptions, Locator, Page, Playwright};
use url::Url;

/// Browser driver running one Chromium page through Playwright.
pub struct PlaywrightDriver {
    page: Page,
    browser: Browser,
    _playwright: Playwright,
}

impl PlaywrightDriver {
    /// Launches Chromium and opens a blank page.
    pub async fn launch(headless: bool) -> Result<Self> {
        let playwright = Playwright::launch().await.map_err(driver_error)?;
        let browser = playwright
            .chromium()
            .launch_with_options(LaunchOptions::new().headless(headless))
            .await
            .map_err(driver_error)?;
        let page = browser.new_page().await.map_err(driver_error)?;

        Ok(Self {
            page,
            browser,
            _playwright: playwright,
        })
    }

    /// Closes the browser; the driver is unusable afterwards.
    pub async fn close(&self) -> Result<()> {
        self.browser.close().await.map_err(driver_error)
    }

    async fn locate(&self, element: &Element) -> Locator {
        self.page.locator(element.selector()).await.first()
    }
}

fn driver_error(err: playwright_rs::Error) -> Error {
    match err {
        playwright_rs::Error::ElementNotFound(selector) => Error::ElementNotFound(selector),
        other => Error::Driver(other.to_string()),
    }
}

#[async_trait]
impl Driver for PlaywrightDriver {
    async fn navigate(&self, url: &Url) -> Result<()> {
        self.page
            .goto(url.as_str(), None)
            .await
            .map(|_| ())
            .map_err(|err| Error::Navigation {
                url: url.to_string(),
                message: err.to_string(),
            })
    }

    async fn current_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.page.url())?)
    }

    async fn find(&self, by: &By) -> Result<Element> {
        let selector = by.to_selector();
        let count = self
            .page
            .locator(&selector)
            .await
            .count()
            .await
            .map_err(driver_error)?;

        if count == 0 {
            return Err(Error::ElementNotFound(selector));
        }
        Ok(Element::new(selector))
    }

    async fn click(&self, element: &Element) -> Result<()> {
        self.locate(element)
            .await
            .click(None)
            .await
            .map_err(driver_error)
    }

    async fn fill(&self, element: &Element, text: &str) -> Result<()> {
        self.locate(element)
            .await
            .fill(text, None)
            .await
            .map_err(driver_error)
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        self.locate(element)
            .await
            .get_attribute(name)
            .await
            .map_err(driver_error)
    }

    async fn page_source(&self) -> Result<String> {
        self.page.content().await.map_err(driver_error)
    }
}

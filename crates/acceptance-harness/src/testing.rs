// Test doubles for the browser driver and the HTTP header probe
//
// `FakeDriver` keeps a small scripted browser state: the current URL, the
// elements present on the page, and a queue of page sources. Every call is
// counted so tests can assert how often a wait observed the page.

use crate::driver::{By, Driver, Element};
use crate::error::{Error, Result};
use crate::http::HeaderProbe;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";
const BLANK_URL: &str = "about:blank";
/// Where Chromium lands after a refused navigation
pub const ERROR_PAGE_URL: &str = "chrome-error://chromewebdata/";

#[derive(Debug, Clone)]
enum Source {
    Html(String),
    NoPage,
}

#[derive(Debug, Clone)]
struct Reveal {
    selector: String,
    attributes: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct State {
    current: Option<Url>,
    elements: HashMap<String, HashMap<String, String>>,
    reveals: HashMap<String, Vec<Reveal>>,
    click_targets: HashMap<String, Url>,
    sources: VecDeque<Source>,
    outages: HashMap<String, usize>,
    refusals: usize,
    navigations: Vec<Url>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    finds: usize,
    source_reads: usize,
}

/// Scripted [`Driver`] for tests.
///
/// Page sources are served in the order they were queued; the last one
/// stays on screen once the queue is drained.
#[derive(Debug, Default)]
pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts an element matching `by` on the page.
    pub fn with_element(self, by: &By) -> Self {
        self.with_element_attrs(by, &[])
    }

    /// Puts an element matching `by` with the given attributes on the page.
    pub fn with_element_attrs(mut self, by: &By, attributes: &[(&str, &str)]) -> Self {
        self.state
            .get_mut()
            .elements
            .insert(by.to_selector(), attrs(attributes));
        self
    }

    /// Clicking `clicked` makes an element matching `revealed` appear.
    pub fn reveal_on_click(mut self, clicked: &By, revealed: &By, attributes: &[(&str, &str)]) -> Self {
        self.state
            .get_mut()
            .reveals
            .entry(clicked.to_selector())
            .or_default()
            .push(Reveal {
                selector: revealed.to_selector(),
                attributes: attrs(attributes),
            });
        self
    }

    /// Clicking `clicked` moves the browser to `target`.
    pub fn navigate_on_click(mut self, clicked: &By, target: Url) -> Self {
        self.state
            .get_mut()
            .click_targets
            .insert(clicked.to_selector(), target);
        self
    }

    /// Queues a page source.
    pub fn serve(mut self, html: impl Into<String>) -> Self {
        self.state.get_mut().sources.push_back(Source::Html(html.into()));
        self
    }

    /// Queues an observation where no page is served at all.
    pub fn serve_no_page(mut self) -> Self {
        self.state.get_mut().sources.push_back(Source::NoPage);
        self
    }

    /// Clicking `clicked` takes the server down for the next `refusals`
    /// navigations. Each refused navigation leaves the browser on its error
    /// page, as Chromium does when nothing listens on the port.
    pub fn outage_on_click(mut self, clicked: &By, refusals: usize) -> Self {
        self.state
            .get_mut()
            .outages
            .insert(clicked.to_selector(), refusals);
        self
    }

    /// Sets the page the browser currently shows.
    pub fn at(mut self, url: Url) -> Self {
        self.state.get_mut().current = Some(url);
        self
    }

    pub fn navigations(&self) -> Vec<Url> {
        self.state.lock().navigations.clone()
    }

    /// Selectors of clicked elements, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    /// `(selector, text)` pairs, in order.
    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().fills.clone()
    }

    pub fn find_calls(&self) -> usize {
        self.state.lock().finds
    }

    pub fn source_reads(&self) -> usize {
        self.state.lock().source_reads
    }
}

fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl Driver for FakeDriver {
    async fn navigate(&self, url: &Url) -> Result<()> {
        let mut state = self.state.lock();
        state.navigations.push(url.clone());
        if state.refusals > 0 {
            state.refusals -= 1;
            state.current = Some(Url::parse(ERROR_PAGE_URL)?);
            return Err(Error::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        state.current = Some(url.clone());
        Ok(())
    }

    async fn current_url(&self) -> Result<Url> {
        let current = self.state.lock().current.clone();
        match current {
            Some(url) => Ok(url),
            None => Ok(Url::parse(BLANK_URL)?),
        }
    }

    async fn find(&self, by: &By) -> Result<Element> {
        let selector = by.to_selector();
        let mut state = self.state.lock();
        state.finds += 1;
        if state.elements.contains_key(&selector) {
            Ok(Element::new(selector))
        } else {
            Err(Error::ElementNotFound(selector))
        }
    }

    async fn click(&self, element: &Element) -> Result<()> {
        let mut state = self.state.lock();
        let selector = element.selector().to_string();
        if let Some(revealed) = state.reveals.remove(&selector) {
            for reveal in revealed {
                state.elements.insert(reveal.selector, reveal.attributes);
            }
        }
        if let Some(refusals) = state.outages.remove(&selector) {
            state.refusals = refusals;
        }
        if let Some(target) = state.click_targets.get(&selector).cloned() {
            state.current = Some(target);
        }
        state.clicks.push(selector);
        Ok(())
    }

    async fn fill(&self, element: &Element, text: &str) -> Result<()> {
        self.state
            .lock()
            .fills
            .push((element.selector().to_string(), text.to_string()));
        Ok(())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        let state = self.state.lock();
        let attributes = state
            .elements
            .get(element.selector())
            .ok_or_else(|| Error::ElementNotFound(element.selector().to_string()))?;
        Ok(attributes.get(name).cloned())
    }

    async fn page_source(&self) -> Result<String> {
        let mut state = self.state.lock();
        state.source_reads += 1;
        let source = if state.sources.len() > 1 {
            state.sources.pop_front()
        } else {
            state.sources.front().cloned()
        };
        match source {
            Some(Source::Html(html)) => Ok(html),
            Some(Source::NoPage) => Err(Error::ElementNotFound("html".to_string())),
            None => Ok(BLANK_PAGE.to_string()),
        }
    }
}

/// [`HeaderProbe`] answering every request with the same header value.
#[derive(Debug)]
pub struct FakeHeaderProbe {
    value: Option<String>,
    calls: AtomicUsize,
}

impl FakeHeaderProbe {
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HeaderProbe for FakeHeaderProbe {
    async fn header(&self, _url: &Url, _name: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.clone())
    }
}

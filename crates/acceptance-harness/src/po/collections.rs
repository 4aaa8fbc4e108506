// Item collections below the root page: jobs, views and agents

use crate::driver::By;
use crate::error::{ResolutionError, Result};
use crate::page::{PageBase, PageObject};
use crate::registry::DynPage;
use crate::resolver::resolve_url;
use crate::wait::{DEFAULT_WAIT_TIMEOUT, UI_SETTLE_TOLERANCE, Wait};
use url::Url;

/// How the "new item" form lets the user pick the item's kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindPicker {
    /// One list entry per kind, class derived from the kind tag
    ListItem,
    /// A `mode` radio button per kind
    ModeRadio,
}

impl KindPicker {
    fn locate(self, kind: &str) -> By {
        match self {
            Self::ListItem => By::css(format!("li.{}", kind.replace('.', "_"))),
            Self::ModeRadio => By::css(format!("input[name=\"mode\"][value=\"{kind}\"]")),
        }
    }
}

/// CRUD-style access to one kind of item collection.
#[derive(Debug, Clone)]
pub struct Collection {
    root: PageBase,
    segment: &'static str,
    new_item: &'static str,
    picker: KindPicker,
}

impl Collection {
    /// Jobs: `job/<name>/`, created from `newJob`.
    pub fn jobs(root: PageBase) -> Self {
        Self {
            root,
            segment: "job",
            new_item: "newJob",
            picker: KindPicker::ListItem,
        }
    }

    /// Views: `view/<name>/`, created from `newView`.
    pub fn views(root: PageBase) -> Self {
        Self {
            root,
            segment: "view",
            new_item: "newView",
            picker: KindPicker::ModeRadio,
        }
    }

    /// Agents: `computer/<name>/`, created from `computer/new`.
    pub fn agents(root: PageBase) -> Self {
        Self {
            root,
            segment: "computer",
            new_item: "computer/new",
            picker: KindPicker::ModeRadio,
        }
    }

    /// Address of item `name`, with the name percent-encoded as one segment.
    pub fn url_of(&self, name: &str) -> Result<Url> {
        let mut url = self.root.url_for(&format!("{}/", self.segment))?;
        url.path_segments_mut()
            .map_err(|_| ResolutionError::InvalidAddress(self.root.url().to_string()))?
            .pop_if_empty()
            .push(name)
            .push("");
        Ok(url)
    }

    /// Page object for the existing item `name`. No I/O.
    pub fn get<T: PageObject>(&self, name: &str) -> Result<T> {
        let context = self.root.context()?;
        resolve_url(&context, self.url_of(name)?)
    }

    /// Page object for item `name` whose type is only known as a kind tag.
    pub fn get_kind(&self, kind: &str, name: &str) -> Result<Box<dyn DynPage>> {
        let context = self.root.context()?;
        context.registry().resolve(kind, &context, self.url_of(name)?)
    }

    /// Creates item `name` of `T`'s declared kind through the "new item" form.
    ///
    /// Returns once the application has moved on to the item's configuration
    /// form.
    pub async fn create<T: PageObject>(&self, name: &str) -> Result<T> {
        let kind = T::DESCRIPTOR.kind.ok_or(ResolutionError::MissingKind {
            page: std::any::type_name::<T>(),
        })?;
        let target = self.url_of(name)?;
        let context = self.root.context()?;
        let config = context.config();

        self.root.visit(self.new_item).await?;
        self.root.fill(&By::name("name"), name).await?;
        self.root.click(&self.picker.locate(kind)).await?;
        self.root.click_button("OK").await?;

        let driver = self.root.driver();
        let target_path = target.path();
        Wait::new(format!("{name} to be created"))
            .with_timeout(config.elastic(DEFAULT_WAIT_TIMEOUT))
            .with_poll_interval(config.poll_interval())
            .ignoring(UI_SETTLE_TOLERANCE)
            .until_true(move || async move {
                let current = driver.current_url().await?;
                Ok(current.path().starts_with(target_path))
            })
            .await
            .map_err(|e| e.context(format!("creating {} '{}'", self.segment, name)))?;

        tracing::debug!("Created {} '{}' of kind {}", self.segment, name, kind);
        resolve_url(&context, target)
    }
}

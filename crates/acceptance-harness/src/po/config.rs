// Global and tool configuration screens

use crate::error::Result;
use crate::page::{PageArea, PageBase, PageObject};
use crate::resolver::resolve_installed_tool;

/// Shown when a form-only URL is hit with a plain GET, i.e. a save went wrong
pub const FORM_SUBMISSION_EXPECTED: &str = "This page expects a form submission";

async fn save_form(page: &PageBase) -> Result<()> {
    page.click_button("Save").await?;
    page.assert_no_content(FORM_SUBMISSION_EXPECTED).await
}

/// Global system configuration (`configure`).
#[derive(Debug, Clone)]
pub struct ConfigPage {
    base: PageBase,
}

impl PageObject for ConfigPage {
    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

impl ConfigPage {
    pub async fn configure(&self) -> Result<()> {
        self.base.ensure_open().await
    }

    pub async fn save(&self) -> Result<()> {
        save_form(&self.base).await
    }
}

/// Tool installations (`configureTools/`).
#[derive(Debug, Clone)]
pub struct ToolConfigPage {
    base: PageBase,
}

impl PageObject for ToolConfigPage {
    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

impl ToolConfigPage {
    pub async fn configure(&self) -> Result<()> {
        self.base.ensure_open().await
    }

    pub async fn save(&self) -> Result<()> {
        save_form(&self.base).await
    }

    /// Adds a new installation of tool `T` and returns its block.
    pub async fn add_tool<T: PageArea>(&self) -> Result<T> {
        resolve_installed_tool(self).await
    }
}

// Page objects for the screens every test needs
//
// Plugin-specific screens live with the tests that use them; this module only
// carries the application's core pages.

mod collections;
mod config;
mod job;
mod root;

pub use collections::Collection;
pub use config::{ConfigPage, FORM_SUBMISSION_EXPECTED, ToolConfigPage};
pub use job::{Build, BuildResult, Job};
pub use root::{PLEASE_WAIT, RootPage};

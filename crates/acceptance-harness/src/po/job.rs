// Jobs and their builds

use crate::error::{Error, FailureKind, Result};
use crate::page::{PageBase, PageDescriptor, PageObject};
use crate::po::config::FORM_SUBMISSION_EXPECTED;
use crate::resolver::resolve_relative;
use crate::wait::Wait;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Marker the console log ends with once a build completes
const FINISHED_MARKER: &str = "Finished: ";

/// The build is still running, or its console is not served yet
const BUILD_RUNNING_TOLERANCE: &[FailureKind] =
    &[FailureKind::Unsatisfied, FailureKind::ElementNotFound];

/// A freestyle job (`job/<name>/`).
#[derive(Debug, Clone)]
pub struct Job {
    base: PageBase,
}

impl PageObject for Job {
    const DESCRIPTOR: PageDescriptor = PageDescriptor::kind("hudson.model.FreeStyleProject");

    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

impl Job {
    /// Opens the job's configuration form.
    pub async fn configure(&self) -> Result<()> {
        self.base.visit("configure").await
    }

    pub async fn save(&self) -> Result<()> {
        self.base.click_button("Save").await?;
        self.base.assert_no_content(FORM_SUBMISSION_EXPECTED).await
    }

    /// Build number `number` of this job.
    pub fn build(&self, number: u32) -> Result<Build> {
        resolve_relative(&self.base, &format!("{number}/"))
    }

    pub fn last_build(&self) -> Result<Build> {
        resolve_relative(&self.base, "lastBuild/")
    }
}

/// Terminal state of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl FromStr for BuildResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "SUCCESS" => Ok(Self::Success),
            "UNSTABLE" => Ok(Self::Unstable),
            "FAILURE" => Ok(Self::Failure),
            "NOT_BUILT" => Ok(Self::NotBuilt),
            "ABORTED" => Ok(Self::Aborted),
            other => Err(Error::Driver(format!("unknown build result '{other}'"))),
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "SUCCESS",
            Self::Unstable => "UNSTABLE",
            Self::Failure => "FAILURE",
            Self::NotBuilt => "NOT_BUILT",
            Self::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

/// Extracts the result from a console log, if the build has finished.
fn parse_result(console: &str) -> Option<Result<BuildResult>> {
    console
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(FINISHED_MARKER))
        .map(str::parse)
}

/// One build of a job (`job/<name>/<n>/`).
#[derive(Debug, Clone)]
pub struct Build {
    base: PageBase,
}

impl PageObject for Build {
    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

impl Build {
    /// Plain-text console log as it stands now.
    pub async fn console(&self) -> Result<String> {
        self.base.visit("consoleText").await?;
        self.base.driver().page_source().await
    }

    /// Result of the build, or `None` while it is still running.
    pub async fn result(&self) -> Result<Option<BuildResult>> {
        parse_result(&self.console().await?).transpose()
    }

    /// Polls the console log until the build reports a result.
    pub async fn wait_until_finished(&self, timeout: Duration) -> Result<BuildResult> {
        let poll_interval = self.base.context()?.config().poll_interval();
        let build = self;

        Wait::new(format!("build {} to finish", self.base.url()))
            .with_timeout(timeout)
            .with_poll_interval(poll_interval)
            .ignoring(BUILD_RUNNING_TOLERANCE)
            .until(move || async move {
                match parse_result(&build.console().await?) {
                    Some(result) => result,
                    None => Err(Error::Unsatisfied(format!(
                        "{} has no '{}' line yet",
                        build.base.url(),
                        FINISHED_MARKER.trim()
                    ))),
                }
            })
            .await
    }

    /// Fails unless the build finished successfully.
    pub async fn should_succeed(&self) -> Result<()> {
        match self.result().await? {
            Some(BuildResult::Success) => Ok(()),
            Some(other) => Err(Error::Unsatisfied(format!(
                "build {} finished with {}",
                self.base.url(),
                other
            ))),
            None => Err(Error::Unsatisfied(format!(
                "build {} has not finished",
                self.base.url()
            ))),
        }
    }

    /// `true` if the console log matches the regular expression `pattern`.
    pub async fn console_contains(&self, pattern: &str) -> Result<bool> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid console pattern '{pattern}': {e}")))?;
        Ok(pattern.is_match(&self.console().await?))
    }
}

// Integration tests for the page registry and item collections
//
// Tests cover:
// - Registering page types by kind tag, and the mistakes registration rejects
// - Resolving items whose type is only known at runtime
// - Creating items through the "new item" form

use acceptance_harness::po::{Job, RootPage};
use acceptance_harness::resolver::resolve;
use acceptance_harness::testing::FakeDriver;
use acceptance_harness::{
    By, Context, Error, FailureKind, PageBase, PageDescriptor, PageObject, PageRegistry,
    ResolutionError,
};
use std::sync::Arc;

mod common;

const FOLDER_KIND: &str = "com.cloudbees.hudson.plugins.folder.Folder";

struct Folder {
    base: PageBase,
}

impl PageObject for Folder {
    const DESCRIPTOR: PageDescriptor = PageDescriptor::kind(FOLDER_KIND);

    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

struct ListView {
    base: PageBase,
}

impl PageObject for ListView {
    const DESCRIPTOR: PageDescriptor = PageDescriptor::kind("hudson.model.ListView");

    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

struct Untyped {
    base: PageBase,
}

impl PageObject for Untyped {
    fn from_base(base: PageBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageBase {
        &self.base
    }
}

fn registered_root(driver: Arc<FakeDriver>) -> (Arc<Context>, RootPage) {
    let context = Context::builder(driver)
        .header_probe(Arc::new(acceptance_harness::testing::FakeHeaderProbe::new(
            Some(common::VERSION_HEADER_VALUE),
        )))
        .register::<Job>("hudson.model.FreeStyleProject")
        .and_then(|builder| builder.register::<Folder>(FOLDER_KIND))
        .expect("Failed to register page kinds")
        .build()
        .expect("Failed to build context");
    let root = resolve(&context, common::ROOT).expect("Failed to resolve root");
    (context, root)
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_registration_rejects_mistakes() {
    common::init_tracing();
    let registry = PageRegistry::new();

    registry
        .register::<Folder>(FOLDER_KIND)
        .expect("Failed to register folder");
    registry
        .register::<Untyped>("org.example.Anything")
        .expect("Pages without declared kind can take any tag");

    let duplicate = registry.register::<Untyped>(FOLDER_KIND);
    assert!(matches!(
        duplicate,
        Err(Error::Resolution(ResolutionError::DuplicateKind(ref kind))) if kind == FOLDER_KIND
    ));

    let mismatched = registry.register::<Folder>("hudson.model.FreeStyleProject");
    assert!(matches!(
        mismatched,
        Err(Error::Resolution(ResolutionError::InvalidDescriptor { .. }))
    ));

    let empty = registry.register::<Untyped>("  ");
    assert!(matches!(
        empty,
        Err(Error::Resolution(ResolutionError::InvalidDescriptor { .. }))
    ));

    assert_eq!(registry.kinds(), vec![FOLDER_KIND, "org.example.Anything"]);
}

#[tokio::test]
async fn test_get_kind_resolves_registered_type() {
    common::init_tracing();
    let driver = Arc::new(FakeDriver::new());
    let (context, root) = registered_root(driver.clone());

    let page = root
        .jobs
        .get_kind(FOLDER_KIND, "team a")
        .expect("Failed to resolve folder");
    assert!(page.type_name().ends_with("Folder"), "{}", page.type_name());
    assert_eq!(
        page.page_base().url().as_str(),
        "http://localhost:8080/jenkins/job/team%20a/"
    );
    assert!(page.as_any().downcast_ref::<Folder>().is_some());
    assert!(page.page_base().is_in(&context));
    assert!(driver.navigations().is_empty());
}

#[tokio::test]
async fn test_unknown_kind_is_an_error() {
    common::init_tracing();
    let (_context, root) = registered_root(Arc::new(FakeDriver::new()));

    let err = root
        .jobs
        .get_kind("org.jenkinsci.plugins.workflow.job.WorkflowJob", "pipeline")
        .err()
        .expect("Unknown kind should fail");
    assert!(matches!(
        err,
        Error::Resolution(ResolutionError::UnknownKind(_))
    ));
    assert_eq!(err.kind(), FailureKind::Resolution);
}

#[tokio::test]
async fn test_resolve_as_checks_the_concrete_type() {
    common::init_tracing();
    let (context, _root) = registered_root(Arc::new(FakeDriver::new()));
    let url = common::root_url().join("job/x/").expect("Invalid job URL");

    let job: Job = context
        .registry()
        .resolve_as("hudson.model.FreeStyleProject", &context, url.clone())
        .expect("Failed to resolve job");
    assert_eq!(job.url(), &url);

    let err = context
        .registry()
        .resolve_as::<Job>(FOLDER_KIND, &context, url)
        .err()
        .expect("Folder is not a job");
    assert!(matches!(
        err,
        Error::Resolution(ResolutionError::KindMismatch { .. })
    ));
}

// ============================================================================
// Collections
// ============================================================================

#[tokio::test]
async fn test_collection_addresses() {
    common::init_tracing();
    let (_context, root) = registered_root(Arc::new(FakeDriver::new()));

    let job: Job = root.jobs.get("my job").expect("Failed to resolve job");
    assert_eq!(
        job.url().as_str(),
        "http://localhost:8080/jenkins/job/my%20job/"
    );

    let view: ListView = root.views.get("All").expect("Failed to resolve view");
    assert_eq!(view.url().as_str(), "http://localhost:8080/jenkins/view/All/");

    let agent: Untyped = root.agents.get("linux-1").expect("Failed to resolve agent");
    assert_eq!(
        agent.url().as_str(),
        "http://localhost:8080/jenkins/computer/linux-1/"
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_job_fills_new_item_form() {
    common::init_tracing();
    let configure = common::root_url()
        .join("job/my%20job/configure")
        .expect("Invalid configure URL");
    let kind_entry = By::css("li.hudson_model_FreeStyleProject");
    let driver = Arc::new(
        FakeDriver::new()
            .with_element(&By::name("name"))
            .with_element(&kind_entry)
            .with_element(&By::button("OK"))
            .navigate_on_click(&By::button("OK"), configure),
    );
    let (_context, root) = registered_root(driver.clone());

    let job: Job = root.jobs.create("my job").await.expect("Failed to create job");
    assert_eq!(
        job.url().as_str(),
        "http://localhost:8080/jenkins/job/my%20job/"
    );

    assert_eq!(
        driver.navigations(),
        vec![common::root_url().join("newJob").expect("Invalid URL")]
    );
    assert_eq!(
        driver.fills(),
        vec![(By::name("name").to_selector(), "my job".to_string())]
    );
    assert_eq!(
        driver.clicks(),
        vec![kind_entry.to_selector(), By::button("OK").to_selector()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_view_picks_mode_radio() {
    common::init_tracing();
    let mode = By::css("input[name=\"mode\"][value=\"hudson.model.ListView\"]");
    let driver = Arc::new(
        FakeDriver::new()
            .with_element(&By::name("name"))
            .with_element(&mode)
            .with_element(&By::button("OK"))
            .navigate_on_click(
                &By::button("OK"),
                common::root_url()
                    .join("view/mine/configure")
                    .expect("Invalid URL"),
            ),
    );
    let (_context, root) = registered_root(driver.clone());

    let view: ListView = root.views.create("mine").await.expect("Failed to create view");
    assert_eq!(view.url().as_str(), "http://localhost:8080/jenkins/view/mine/");
    assert_eq!(driver.clicks()[0], mode.to_selector());
}

#[tokio::test(start_paused = true)]
async fn test_create_times_out_when_application_stays_on_form() {
    common::init_tracing();
    let driver = Arc::new(
        FakeDriver::new()
            .with_element(&By::name("name"))
            .with_element(&By::css("li.hudson_model_FreeStyleProject"))
            .with_element(&By::button("OK")),
    );
    let (_context, root) = registered_root(driver);

    let err = root
        .jobs
        .create::<Job>("stuck")
        .await
        .err()
        .expect("Creation should time out");
    assert_eq!(err.kind(), FailureKind::Timeout);
    assert!(err.to_string().contains("creating job 'stuck'"), "{err}");
}

#[tokio::test]
async fn test_create_requires_declared_kind() {
    common::init_tracing();
    let driver = Arc::new(FakeDriver::new());
    let (_context, root) = registered_root(driver.clone());

    let err = root
        .agents
        .create::<Untyped>("linux-1")
        .await
        .err()
        .expect("Untyped page cannot be created");
    assert!(matches!(
        err,
        Error::Resolution(ResolutionError::MissingKind { .. })
    ));
    assert!(driver.navigations().is_empty());
}

//! End-to-end storefront scenarios.
//!
//! One on-disk project drives both halves of the toolkit: the build-time
//! override resolver and the runtime extension bootstrap. Both must agree on
//! which extensions participate and in which order.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::RawQuery;
use axum::http::Request;
use axum::routing::get;
use serde_json::Value;
use storefront_extensions::{ExtensionConfig, ProjectConfig, ProjectConfigResolver};
use storefront_fs::NormalizedPath;
use storefront_resolver::{CompilationContext, ImportTransform, OverrideResolver, ResolverOptions};
use storefront_runtime::{
    ApplicationExtension, Component, ExtensionBase, ExtensionCatalog, ExtensionError,
    ExtensionSet, Props, RequestProcessor, Route, ServerOptions,
};
use storefront_test_utils::project::TestProject;
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Test Infrastructure
// =============================================================================

const CONFIG: &str = r#"
[app]
extensions = [
    "extension-theme",
    ["@acme/extension-analytics", { trackingId = "UA-1" }],
    ["extension-legacy", { enabled = false }],
]

[ssr]
strip_parameters = ["gclid"]
"#;

const MAIN: &str = "import Header from '*/app/components/header'
import Footer from '*/app/components/footer'
import routes from '*/app/routes'
";

fn storefront_project() -> TestProject {
    let project = TestProject::new();
    project.write_raw_config(CONFIG);
    project.add_base_file("app/main.jsx", MAIN);
    project.add_base_file("app/routes.jsx", "export default []");
    project.add_base_file("app/components/footer.jsx", "base footer");
    project.add_extension_file("extension-theme", "app/components/header.jsx", "theme header");
    project.add_extension_file(
        "@acme/extension-analytics",
        "app/components/header/index.tsx",
        "analytics header",
    );
    project.add_extension_file("extension-legacy", "app/components/footer.jsx", "legacy footer");
    project
}

fn load_config(project: &TestProject) -> (NormalizedPath, ProjectConfig) {
    let global = TempDir::new().unwrap();
    let root = NormalizedPath::new(project.root()).canonicalize().unwrap();
    let config = ProjectConfigResolver::with_global_config_dir(root.clone(), global.path().into())
        .resolve()
        .unwrap();
    (root, config)
}

/// Wraps the app and exposes `/api/<tag>` echoing its setting and query.
struct Tagging {
    base: ExtensionBase,
    tag: &'static str,
}

impl ApplicationExtension for Tagging {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    fn name(&self) -> &str {
        self.tag
    }

    fn extend_app(&self, app: Component) -> Result<Component, ExtensionError> {
        let tag = self.tag;
        Ok(Component::new(
            format!("{tag}({})", app.display_name()),
            move |props: &Props| format!("<{tag}>{}</{tag}>", app.render(props)),
        ))
    }

    fn extend_routes(&self, mut routes: Vec<Route>) -> Result<Vec<Route>, ExtensionError> {
        let page = Component::new(self.tag, |_: &Props| String::new());
        routes.push(Route::new(format!("/{}", self.tag), page));
        Ok(routes)
    }

    fn extend_server(&self, router: Router) -> Result<Router, ExtensionError> {
        let setting = self
            .config()
            .get("trackingId")
            .cloned()
            .unwrap_or(Value::Null)
            .to_string();
        Ok(router.route(
            &format!("/api/{}", self.tag),
            get(move |RawQuery(query): RawQuery| async move {
                format!("{setting} {}", query.unwrap_or_default())
            }),
        ))
    }
}

fn theme(
    options: ServerOptions,
    config: ExtensionConfig,
) -> Result<Box<dyn ApplicationExtension>, ExtensionError> {
    Ok(Box::new(Tagging {
        base: ExtensionBase::new(options, config),
        tag: "theme",
    }))
}

fn analytics(
    options: ServerOptions,
    config: ExtensionConfig,
) -> Result<Box<dyn ApplicationExtension>, ExtensionError> {
    Ok(Box::new(Tagging {
        base: ExtensionBase::new(options, config),
        tag: "analytics",
    }))
}

fn legacy(
    options: ServerOptions,
    config: ExtensionConfig,
) -> Result<Box<dyn ApplicationExtension>, ExtensionError> {
    Ok(Box::new(Tagging {
        base: ExtensionBase::new(options, config),
        tag: "legacy",
    }))
}

fn catalog() -> ExtensionCatalog {
    let mut catalog = ExtensionCatalog::new();
    catalog
        .register("extension-theme", theme)
        .register("@acme/extension-analytics", analytics)
        .register("extension-legacy", legacy);
    catalog
}

async fn get_body(router: Router, uri: &str) -> String {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

// =============================================================================
// Build time
// =============================================================================

#[test]
fn build_rewrites_main_module_against_enabled_extensions() {
    let project = storefront_project();
    let (root, config) = load_config(&project);
    let options = ResolverOptions::for_project(&root, &config).unwrap();
    let resolver = OverrideResolver::new(config.registry(), options);
    let transform = ImportTransform::new(&resolver);

    let main = root.join("app/main.jsx");
    let mut compilation = CompilationContext::new();
    let output = transform.rewrite_source(&mut compilation, &main, MAIN).unwrap();
    assert_eq!(compilation.finish(), 3);
    project.write_file("build/main.js", &output);

    // Later-declared analytics wins over theme, through its directory index.
    project.assert_file_contains(
        "build/main.js",
        "node_modules/@acme/extension-analytics/app/components/header/index.tsx'",
    );
    // The disabled legacy extension never shadows the base footer.
    project.assert_file_contains(
        "build/main.js",
        &format!("from '{}'", root.join("app/components/footer.jsx")),
    );
    project.assert_file_contains(
        "build/main.js",
        &format!("from '{}'", root.join("app/routes.jsx")),
    );
}

#[test]
fn extension_override_can_extend_the_overridden_file() {
    let project = storefront_project();
    let (root, config) = load_config(&project);
    let resolver = OverrideResolver::new(
        config.registry(),
        ResolverOptions::for_project(&root, &config).unwrap(),
    );
    let transform = ImportTransform::new(&resolver);

    let header = root.join("node_modules/@acme/extension-analytics/app/components/header/index.tsx");
    let mut compilation = CompilationContext::new();
    let err = transform
        .rewrite_source(&mut compilation, &header, "import Base from '*/app/components/header'\n")
        .unwrap_err();
    // Last-declared extension: nothing left to fall through to.
    assert!(err.to_string().contains("no candidates"));

    let theme_header = root.join("node_modules/extension-theme/app/components/header.jsx");
    let output = transform
        .rewrite_source(
            &mut compilation,
            &theme_header,
            "import Next from '*/app/components/header'\n",
        )
        .unwrap();
    assert!(output.contains("extension-analytics/app/components/header/index.tsx"));
}

// =============================================================================
// Runtime
// =============================================================================

#[tokio::test]
async fn runtime_bootstrap_follows_the_same_declared_order() {
    let project = storefront_project();
    let (root, config) = load_config(&project);
    let server_options = ServerOptions {
        project_dir: root.to_native(),
        ..ServerOptions::default()
    };

    let set = ExtensionSet::load(&config.registry(), &catalog(), &server_options).unwrap();
    assert_eq!(set.packages(), vec!["extension-theme", "@acme/extension-analytics"]);

    let app = Component::new("App", |_: &Props| "app".to_string());
    let home = Route::new("/", Component::new("Home", |_: &Props| String::new()));
    let bootstrapped = set.bootstrap(app, vec![home], Router::new()).unwrap();

    assert_eq!(bootstrapped.app.display_name(), "analytics(theme(App))");
    assert_eq!(
        bootstrapped.app.render(&Value::Null),
        "<analytics><theme>app</theme></analytics>"
    );
    let paths: Vec<&str> = bootstrapped.routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/theme", "/analytics"]);

    let router = RequestProcessor::from_config(&config.ssr).apply(bootstrapped.router);
    assert_eq!(
        get_body(router.clone(), "/api/analytics?GCLID=abc&page=%2e").await,
        "\"UA-1\" page=."
    );
    assert_eq!(get_body(router, "/api/theme?gclid=1").await, "null ");
}

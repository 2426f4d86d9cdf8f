//! Extension composition through a full bootstrap

use std::io;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use storefront_extensions::{ExtensionConfig, ExtensionEntry, ExtensionRegistry};
use storefront_runtime::{
    ApplicationExtension, Component, Error, ExtensionBase, ExtensionCatalog, ExtensionError,
    ExtensionSet, Props, Route, ServerOptions, Stage, StaticValue,
};
use tower::ServiceExt;

/// Wraps the app in a tag named after its `tag` setting and adds a route
/// and a server endpoint of the same name.
struct Tagging {
    base: ExtensionBase,
}

impl Tagging {
    fn tag(&self) -> String {
        self.config().get_str("tag").unwrap_or("tag").to_string()
    }
}

impl ApplicationExtension for Tagging {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    fn extend_app(&self, app: Component) -> Result<Component, ExtensionError> {
        let tag = self.tag();
        let name = format!("{tag}({})", app.display_name());
        Ok(Component::new(name, move |props: &Props| {
            format!("<{tag}>{}</{tag}>", app.render(props))
        }))
    }

    fn extend_routes(&self, mut routes: Vec<Route>) -> Result<Vec<Route>, ExtensionError> {
        let tag = self.tag();
        let page = Component::new(tag.clone(), |_: &Props| String::new());
        routes.push(Route::new(format!("/{tag}"), page));
        Ok(routes)
    }

    fn extend_server(&self, router: Router) -> Result<Router, ExtensionError> {
        let tag = self.tag();
        Ok(router.route(&format!("/api/{tag}"), get(move || async move { tag })))
    }
}

fn tagging(
    server_options: ServerOptions,
    config: ExtensionConfig,
) -> Result<Box<dyn ApplicationExtension>, ExtensionError> {
    Ok(Box::new(Tagging {
        base: ExtensionBase::new(server_options, config),
    }))
}

struct Failing {
    base: ExtensionBase,
}

impl ApplicationExtension for Failing {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    fn extend_routes(&self, _routes: Vec<Route>) -> Result<Vec<Route>, ExtensionError> {
        Err("route table unavailable".into())
    }
}

fn failing(
    server_options: ServerOptions,
    config: ExtensionConfig,
) -> Result<Box<dyn ApplicationExtension>, ExtensionError> {
    Ok(Box::new(Failing {
        base: ExtensionBase::new(server_options, config),
    }))
}

fn refusing(
    _server_options: ServerOptions,
    _config: ExtensionConfig,
) -> Result<Box<dyn ApplicationExtension>, ExtensionError> {
    Err("missing license key".into())
}

fn configured(package: &str, tag: &str) -> ExtensionEntry {
    let mut config = ExtensionConfig::default();
    config.settings.insert("tag".into(), json!(tag));
    ExtensionEntry::from((package, config))
}

fn catalog() -> ExtensionCatalog {
    let mut catalog = ExtensionCatalog::new();
    catalog
        .register("extension-a", tagging)
        .register("extension-b", tagging)
        .register("extension-c", tagging)
        .register("extension-failing", failing)
        .register("extension-refusing", refusing);
    catalog
}

fn app() -> Component {
    Component::new("App", |_: &Props| "app".to_string())
        .with_static("getProps", StaticValue::hook(|_: &Props| json!({ "ready": true })))
}

#[test]
fn extensions_wrap_app_in_declared_order() {
    let registry = ExtensionRegistry::new(vec![
        configured("extension-a", "a"),
        configured("extension-b", "b"),
    ]);
    let set = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default()).unwrap();
    assert_eq!(set.packages(), vec!["extension-a", "extension-b"]);

    let app = set.extend_app(app()).unwrap();
    assert_eq!(app.display_name(), "b(a(App))");
    assert_eq!(app.render(&Value::Null), "<b><a>app</a></b>");
    assert_eq!(
        app.call_static("getProps", &Value::Null),
        Some(json!({ "ready": true }))
    );
}

#[test]
fn disabled_and_unregistered_extensions_are_skipped() {
    let disabled = ExtensionConfig {
        enabled: false,
        ..ExtensionConfig::default()
    };
    let registry = ExtensionRegistry::new(vec![
        configured("extension-a", "a"),
        ExtensionEntry::from(("extension-b", disabled)),
        ExtensionEntry::from("extension-unknown"),
    ]);
    let set = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default()).unwrap();
    assert_eq!(set.packages(), vec!["extension-a"]);
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn unregistered_extension_is_logged_as_warning() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let registry = ExtensionRegistry::new(vec![
        configured("extension-a", "a"),
        ExtensionEntry::from("extension-typo"),
    ]);
    let set = tracing::subscriber::with_default(subscriber, || {
        ExtensionSet::load(&registry, &catalog(), &ServerOptions::default()).unwrap()
    });

    assert_eq!(set.packages(), vec!["extension-a"]);
    let output = logs.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("extension-typo"), "{output}");
}

#[test]
fn no_extensions_leaves_app_untouched() {
    let set = ExtensionSet::load(&ExtensionRegistry::default(), &catalog(), &ServerOptions::default())
        .unwrap();
    assert!(set.is_empty());
    let app = set.extend_app(app()).unwrap();
    assert_eq!(app.display_name(), "App");
}

#[test]
fn routes_accumulate_in_declared_order() {
    let registry = ExtensionRegistry::new(vec![
        configured("extension-a", "a"),
        configured("extension-c", "c"),
    ]);
    let set = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default()).unwrap();
    let home = Route::new("/", Component::new("Home", |_: &Props| String::new()));

    let routes = set.extend_routes(vec![home]).unwrap();
    let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/a", "/c"]);
}

#[test]
fn failing_hook_aborts_bootstrap() {
    let registry = ExtensionRegistry::from_names(["extension-a", "extension-failing"]);
    let set = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default()).unwrap();

    let err = set
        .bootstrap(app(), Vec::new(), Router::new())
        .err()
        .unwrap();
    match &err {
        Error::Bootstrap {
            extension, stage, ..
        } => {
            assert_eq!(extension, "extension-failing");
            assert_eq!(*stage, Stage::ExtendRoutes);
        }
        other => panic!("expected Bootstrap, got {other:?}"),
    }
    assert!(err.to_string().contains("route table unavailable"));
}

#[test]
fn failing_constructor_aborts_load() {
    let registry = ExtensionRegistry::from_names(["extension-refusing"]);
    let err = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::Bootstrap {
            stage: Stage::Construct,
            ..
        }
    ));
}

#[test]
fn invalid_registry_is_rejected() {
    let registry = ExtensionRegistry::from_names(["not-an-extension"]);
    let err = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default())
        .err()
        .unwrap();
    assert!(matches!(err, Error::Extensions(_)));
}

#[tokio::test]
async fn extend_server_mounts_extension_handlers() {
    let registry = ExtensionRegistry::new(vec![
        configured("extension-a", "a"),
        configured("extension-b", "b"),
    ]);
    let set = ExtensionSet::load(&registry, &catalog(), &ServerOptions::default()).unwrap();
    let router = set
        .extend_server(Router::new().route("/", get(|| async { "base" })))
        .unwrap();

    for (uri, status) in [
        ("/", StatusCode::OK),
        ("/api/a", StatusCode::OK),
        ("/api/b", StatusCode::OK),
        ("/api/c", StatusCode::NOT_FOUND),
    ] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), status, "{uri}");
    }
}

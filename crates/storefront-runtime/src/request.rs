//! SSR request normalization.
//!
//! Marketing and tracking parameters make otherwise identical page requests
//! look different to caches. [`RequestProcessor`] strips the configured
//! parameters and re-serializes the remaining query in canonical form
//! before the request reaches the renderer.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::Uri;
use axum::http::uri::PathAndQuery;
use axum::middleware::{self, Next};
use axum::response::Response;
use storefront_extensions::SsrSection;

use crate::query::QueryParameters;

/// A request path and query after processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedRequest {
    pub path: String,
    /// Canonical query, without the leading `?`. Empty when nothing is left.
    pub query: String,
}

impl ProcessedRequest {
    /// `path?query`, or just `path` when the query is empty.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Removes configured query parameters from incoming requests.
#[derive(Debug, Clone, Default)]
pub struct RequestProcessor {
    strip: Vec<String>,
}

impl RequestProcessor {
    pub fn new<I, S>(strip: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strip: strip.into_iter().map(Into::into).collect(),
        }
    }

    /// Processor for a project's `[ssr]` section.
    pub fn from_config(ssr: &SsrSection) -> Self {
        Self::new(ssr.strip_parameters.iter().cloned())
    }

    /// Keys removed from every request.
    pub fn strip_parameters(&self) -> &[String] {
        &self.strip
    }

    /// Strip configured parameters and canonicalize the rest.
    pub fn process(&self, path: &str, query: Option<&str>) -> ProcessedRequest {
        let mut parameters = QueryParameters::new(query);
        for key in &self.strip {
            let removed = parameters.delete_by_key(key);
            if removed > 0 {
                tracing::debug!(key = %key, removed, "Stripped query parameter");
            }
        }
        ProcessedRequest {
            path: path.to_string(),
            query: parameters.to_string(),
        }
    }

    /// Rewrite `uri` in place of its path and query. `None` if the result is
    /// not a valid URI.
    pub fn rewrite_uri(&self, uri: &Uri) -> Option<Uri> {
        let processed = self.process(uri.path(), uri.query());
        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(PathAndQuery::try_from(processed.url()).ok()?);
        Uri::from_parts(parts).ok()
    }

    /// Wrap the routes of `router` so every matched request is processed
    /// before its handler runs.
    ///
    /// The layer runs after route matching and only covers routes already on
    /// `router`. Call it on the router returned by
    /// [`ExtensionSet::extend_server`](crate::ExtensionSet::extend_server),
    /// never before.
    pub fn apply(&self, router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(self.clone(), process_request))
    }
}

async fn process_request(
    State(processor): State<RequestProcessor>,
    mut request: Request,
    next: Next,
) -> Response {
    match processor.rewrite_uri(request.uri()) {
        Some(uri) => *request.uri_mut() = uri,
        None => tracing::warn!(uri = %request.uri(), "Could not rewrite request URI"),
    }
    next.run(request).await
}

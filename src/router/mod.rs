//! Request routing: map exact paths and methods to handler functions.
//!
//! Routes are matched in registration order on `(method, path)`. Trailing
//! slashes are normalized, so `/api/author/` reaches the `/api/author` route.
//! A path that is registered under other methods answers `405 Method Not
//! Allowed` with an `Allow` header; an unknown path answers `404 Not Found`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{Method, Request, Response, StatusCode};

/// Type-erased async handler stored by the router.
///
/// Built for you by [`Router::get`] and [`Router::route`].
pub type Handler =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Any `Fn(Request) -> impl Future<Output = Response>` that can be shared
/// across tasks.
pub trait IntoHandler: Send + Sync + 'static {
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(request))
    }
}

fn normalize(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Method + exact-path dispatcher.
///
/// # Examples
///
/// ```rust,no_run
/// use crypto_news::{Request, Response, Router, StatusCode};
///
/// let mut router = Router::new();
/// router.get("/health", |_req: Request| async { Response::new(StatusCode::NoContent) });
/// assert_eq!(router.len(), 1);
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a `GET` handler for `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.route(Method::Get, path, handler);
    }

    /// Registers `handler` for an arbitrary method.
    pub fn route(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        let handler: Handler = Arc::new(move |req| handler.call(req));
        self.routes.push(Route {
            method,
            path: normalize(path).to_owned(),
            handler,
        });
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches `request` to the first route matching its method and path.
    pub async fn dispatch(&self, request: Request) -> Response {
        let path = normalize(request.path());

        if let Some(route) = self
            .routes
            .iter()
            .find(|r| r.path == path && &r.method == request.method())
        {
            return (route.handler)(request).await;
        }

        let allowed: Vec<&str> = self
            .routes
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.method.as_str())
            .collect();

        if allowed.is_empty() {
            Response::new(StatusCode::NotFound).body("Not Found")
        } else {
            Response::new(StatusCode::MethodNotAllowed)
                .header("Allow", allowed.join(", "))
                .body("Method Not Allowed")
        }
    }
}

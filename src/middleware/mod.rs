//! Middleware pipeline: before/after logic wrapped around the router.
//!
//! - [`Middleware`]: trait implemented by all middleware.
//! - [`Next`]: cursor into the remaining chain; call [`Next::run`] to advance.
//! - [`MiddlewareHandler`]: type-erased, cheaply-cloneable middleware function.
//! - [`Pipeline`]: an ordered middleware stack that ends in a [`Router`].
//! - [`LoggerMiddleware`]: one `tracing` line per request.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::time::Instant;

use crate::{Request, Response, Router, StatusCode};

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is consumed by [`run`](Self::run), so each middleware can forward a
/// request at most once.
pub struct Next {
    middlewares: Arc<[MiddlewareHandler]>,
    index: usize,
}

/// A type-erased, reference-counted middleware function.
pub type MiddlewareHandler = Arc<
    dyn Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static,
>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |req: Request, next: Next| middleware.handle(req, next))
}

impl Next {
    pub fn new(middlewares: Arc<[MiddlewareHandler]>) -> Self {
        Self {
            middlewares,
            index: 0,
        }
    }

    /// Invokes the next layer and returns its response.
    ///
    /// An exhausted chain yields `500`, since a well-formed pipeline always
    /// ends in a terminal handler.
    pub async fn run(mut self, req: Request) -> Response {
        match self.middlewares.get(self.index).cloned() {
            Some(handler) => {
                self.index += 1;
                handler(req, self).await
            }
            None => Response::new(StatusCode::InternalServerError)
                .body("No response generated by middleware pipeline"),
        }
    }
}

/// The core middleware trait.
///
/// Implementors may pass through (`next.run(req).await`), short-circuit by
/// returning their own [`Response`], or decorate the downstream response.
/// Middleware is shared across Tokio tasks, hence `Send + Sync`.
pub trait Middleware: Send + Sync {
    fn handle(&self, req: Request, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

/// An ordered middleware stack whose innermost layer is a [`Router`].
///
/// # Examples
///
/// ```rust,no_run
/// use crypto_news::middleware::{LoggerMiddleware, Pipeline};
/// use crypto_news::Router;
///
/// let pipeline = Pipeline::new(Router::new()).with(LoggerMiddleware);
/// # let _ = pipeline;
/// ```
pub struct Pipeline {
    layers: Vec<MiddlewareHandler>,
    router: Arc<Router>,
    chain: Option<Arc<[MiddlewareHandler]>>,
}

impl Pipeline {
    pub fn new(router: Router) -> Self {
        Self {
            layers: Vec::new(),
            router: Arc::new(router),
            chain: None,
        }
    }

    /// Appends a middleware; earlier layers wrap later ones.
    #[must_use]
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.layers.push(from_middleware(Arc::new(middleware)));
        self.chain = None;
        self
    }

    fn chain(&self) -> Arc<[MiddlewareHandler]> {
        if let Some(chain) = &self.chain {
            return Arc::clone(chain);
        }
        let terminal = from_middleware(Arc::new(Dispatch(Arc::clone(&self.router))));
        self.layers
            .iter()
            .cloned()
            .chain(std::iter::once(terminal))
            .collect()
    }

    /// Freezes the stack so [`handle`](Self::handle) stops rebuilding it.
    #[must_use]
    pub fn build(mut self) -> Self {
        self.chain = Some(self.chain());
        self
    }

    /// Runs `req` through every layer and the router.
    pub async fn handle(&self, req: Request) -> Response {
        Next::new(self.chain()).run(req).await
    }
}

// Innermost layer: hands the request to the router and ignores `next`.
struct Dispatch(Arc<Router>);

impl Middleware for Dispatch {
    fn handle(&self, req: Request, _next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        let router = Arc::clone(&self.0);
        Box::pin(async move { router.dispatch(req).await })
    }
}

/// Logs method, path, status, and duration once the response is ready.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, req: Request, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = req.method().as_str().to_owned();
            let path = req.path().to_owned();

            let response = next.run(req).await;

            tracing::info!(
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                elapsed = ?start.elapsed(),
                "request served"
            );

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(path: &str) -> Request {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        Request::parse(raw.as_bytes()).unwrap().0
    }

    struct Stamp(&'static str);

    impl Middleware for Stamp {
        fn handle(
            &self,
            req: Request,
            next: Next,
        ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
            let tag = self.0;
            Box::pin(async move {
                let mut response = next.run(req).await;
                let seen = response
                    .headers()
                    .get("x-layers")
                    .map(|v| format!("{v},{tag}"))
                    .unwrap_or_else(|| tag.to_owned());
                response.set_header("X-Layers", seen);
                response
            })
        }
    }

    struct Deny;

    impl Middleware for Deny {
        fn handle(&self, _req: Request, _next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
            Box::pin(async { Response::new(StatusCode::ServiceUnavailable) })
        }
    }

    fn router() -> Router {
        let mut router = Router::new();
        router.get("/ok", |_req: Request| async { Response::new(StatusCode::Ok) });
        router
    }

    #[tokio::test]
    async fn empty_chain_falls_back_to_500() {
        let res = Next::new(Arc::from(Vec::new())).run(make_request("/")).await;
        assert_eq!(res.status(), StatusCode::InternalServerError);
    }

    #[tokio::test]
    async fn pipeline_without_layers_is_the_router() {
        let pipeline = Pipeline::new(router());
        assert_eq!(pipeline.handle(make_request("/ok")).await.status(), StatusCode::Ok);
        assert_eq!(
            pipeline.handle(make_request("/missing")).await.status(),
            StatusCode::NotFound
        );
    }

    #[tokio::test]
    async fn outer_layer_sees_response_last() {
        let pipeline = Pipeline::new(router())
            .with(Stamp("outer"))
            .with(Stamp("inner"))
            .build();
        let res = pipeline.handle(make_request("/ok")).await;
        assert_eq!(res.headers().get("x-layers"), Some("inner,outer"));
    }

    #[tokio::test]
    async fn short_circuit_skips_router() {
        let pipeline = Pipeline::new(router()).with(Deny);
        let res = pipeline.handle(make_request("/ok")).await;
        assert_eq!(res.status(), StatusCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn logger_passes_response_through() {
        let pipeline = Pipeline::new(router()).with(LoggerMiddleware).build();
        assert_eq!(pipeline.handle(make_request("/ok")).await.status(), StatusCode::Ok);
    }
}

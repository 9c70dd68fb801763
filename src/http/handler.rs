//! Handler abstraction.
//!
//! A handler is any `Fn(ResponseWriter, Request) -> impl Future<Output = HandlerResult>`.
//! It answers by writing through the [`ResponseWriter`]; returning `Err` hands
//! the failure to the dispatcher's recovery boundary.

use std::future::Future;
use std::sync::Arc;

use axum::http::Method;
use futures_util::future::BoxFuture;

use crate::error::HandlerError;
use crate::http::request::Request;
use crate::http::response::ResponseWriter;
use crate::routing::Route;

pub type HandlerResult = Result<(), HandlerError>;

pub trait Handler: Send + Sync + 'static {
    fn call(&self, w: ResponseWriter, r: Request) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, w: ResponseWriter, r: Request) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(w, r))
    }
}

pub type BoxedHandler = Arc<dyn Handler>;

impl Route<BoxedHandler> {
    /// Register `handler` for `method` on `pattern`.
    pub fn handle<F, Fut>(method: Method, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Route::new(method, pattern, Arc::new(handler) as BoxedHandler)
    }

    pub fn get<F, Fut>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::handle(Method::GET, pattern, handler)
    }

    pub fn post<F, Fut>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::handle(Method::POST, pattern, handler)
    }

    pub fn put<F, Fut>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::handle(Method::PUT, pattern, handler)
    }

    pub fn patch<F, Fut>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::handle(Method::PATCH, pattern, handler)
    }

    pub fn delete<F, Fut>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResponseWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::handle(Method::DELETE, pattern, handler)
    }
}

//! Pathway is a trie-based HTTP router with nested route groups and
//! composable middleware.
//!
//! Routes are registered on a tree of [`RouterGroup`]s, each contributing a
//! path prefix and a middleware list. Building the tree produces an immutable
//! [`Router`], which dispatches requests by walking a segment trie: literal
//! segments win over `{name}` parameters, which win over `{name...}`
//! catch-alls.
//!
//! # Example
//!
//! ```no_run
//! use pathway::{handler, middleware::Tracing, Context, EndpointExt, RouterGroup, Server};
//!
//! #[handler]
//! async fn hello(ctx: Context) -> String {
//!     format!("hello: {}", ctx.param("name"))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut root = RouterGroup::new();
//!     root.get("/hello/{name}", hello);
//!
//!     let app = root.into_router().with(Tracing);
//!     let server = Server::bind("127.0.0.1:3000").await.unwrap();
//!     server.run(app).await.unwrap();
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod context;
pub mod endpoint;
pub mod error;
pub mod middleware;
pub mod route;
pub mod service;
pub mod web;

#[doc(inline)]
pub use http;

mod body;
mod request;
mod response;
mod server;

pub use async_trait::async_trait;
pub use body::Body;
pub use context::{Context, PathParams};
pub use endpoint::{Endpoint, EndpointExt};
pub use error::RouteError;
pub use middleware::{Middleware, MiddlewareExt};
pub use pathway_derive::handler;
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder};
pub use route::{Pattern, Route, Router, RouterGroup};
pub use server::Server;
pub use web::IntoResponse;

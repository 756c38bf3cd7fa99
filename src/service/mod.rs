//! Adapters for mounting an [`Endpoint`](crate::Endpoint) in a hyper server.

mod hyper_service;

pub use hyper_service::{EndpointService, MakeEndpointService};

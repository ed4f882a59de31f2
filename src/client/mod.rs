//! Production log client implementations

pub mod http;

pub use http::{build_http_client, HttpLogClient};

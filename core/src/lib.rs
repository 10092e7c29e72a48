//! Blocking client for the pinhub pinning/storage API.
//!
//! # Overview
//! Each API endpoint maps to one `PinClient` method. A method builds an
//! `HttpRequest` (URL, bearer header, JSON or multipart body), passes it to
//! the client's `Transport`, and returns the transport's response untouched.
//! Decoding response bodies is left to the caller.
//!
//! # Design
//! - `PinClient` is stateless apart from its immutable `ClientConfig`.
//! - `build_*` methods are pure, so request shapes are testable without I/O
//!   and any HTTP stack can execute them.
//! - `ReqwestTransport` is the default transport; multipart file parts are
//!   opened only while their request is in flight.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::PinClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::TransportError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Part, PartValue, RequestBody, Transport};
pub use transport::ReqwestTransport;
pub use types::{FileEntry, Pagination, TokenOptions};

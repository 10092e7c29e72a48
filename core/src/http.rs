//! HTTP request/response types and the transport seam.
//!
//! # Design
//! Requests are described as plain data. `PinClient::build_*` methods produce
//! `HttpRequest` values without touching the network or the file system; a
//! `Transport` turns them into real I/O. File parts carry only a path, so a
//! handle is opened by the transport for the duration of one send.

use std::path::PathBuf;

use serde::de::DeserializeOwned;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One named field of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub value: PartValue,
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::File(path.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    /// Streamed from this local path when the request is sent.
    File(PathBuf),
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// Parts in wire order.
    Multipart(Vec<Part>),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn url_with_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.url)
    }

    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            _ => None,
        }
    }

    pub fn parts(&self) -> Option<&[Part]> {
        match &self.body {
            Some(RequestBody::Multipart(parts)) => Some(parts),
            _ => None,
        }
    }
}

/// An HTTP response described as plain data.
///
/// Returned by `ReqwestTransport` for every status code; the client never
/// looks inside it. Every response header is kept in received order. Header
/// values and the body are decoded as UTF-8, with invalid bytes replaced by
/// U+FFFD.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Executes an `HttpRequest` and hands back whatever the underlying HTTP
/// stack produces. Errors are the transport's own.
pub trait Transport {
    type Response;
    type Error;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Response = T::Response;
    type Error = T::Error;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error> {
        (**self).execute(request)
    }
}

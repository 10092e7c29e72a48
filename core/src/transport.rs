//! Default transport backed by `reqwest::blocking`.

use std::time::Duration;

use reqwest::blocking::{multipart::Form, Client, RequestBuilder};
use reqwest::Method;
use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Part, PartValue, RequestBody, Transport};

/// Sends requests with a shared blocking reqwest client. Every status code
/// is returned as an `HttpResponse`; only I/O failures become errors.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout` bounds each whole request, from connect to end of body.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    /// Use an already configured reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: HttpRequest) -> Result<RequestBuilder, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(parts)) => builder.multipart(build_form(parts)?),
        };
        Ok(builder)
    }
}

/// Assemble parts in order. File parts open their handle here; the handle
/// lives inside the form and is closed when the request is dropped.
fn build_form(parts: Vec<Part>) -> Result<Form, TransportError> {
    parts.into_iter().try_fold(Form::new(), |form, part| match part.value {
        PartValue::Text(text) => Ok(form.text(part.name, text)),
        PartValue::File(path) => form
            .file(part.name, &path)
            .map_err(|source| TransportError::File { path, source }),
    })
}

impl Transport for ReqwestTransport {
    type Response = HttpResponse;
    type Error = TransportError;

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(
            method = request.method.as_str(),
            url = %request.url_with_query(),
            parts = request.parts().map_or(0, |p| p.len()),
            "sending request"
        );

        let response = self.prepare(request)?.send()?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text()?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

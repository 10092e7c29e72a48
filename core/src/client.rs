//! Request builder and dispatcher for the pinning API.
//!
//! # Design
//! `PinClient` holds an immutable `ClientConfig` and a transport, and carries
//! no other state between calls. Each endpoint is split into a `build_*`
//! method that produces an `HttpRequest` and an executing method that hands
//! that request to the transport and returns the transport's result as-is.
//! Callers that want to run the I/O themselves can use `build_*` directly.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, Part, RequestBody, Transport};
use crate::transport::ReqwestTransport;
use crate::types::{FileEntry, Pagination, TokenOptions};

/// Client for the pinning API.
///
/// Safe to share between threads when the transport is; no call mutates the
/// client.
#[derive(Debug, Clone)]
pub struct PinClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl PinClient<ReqwestTransport> {
    /// Client using the default reqwest transport with the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> PinClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    pub fn build_upload_file(&self, path: impl AsRef<Path>) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            "/files",
            Some(RequestBody::Multipart(vec![Part::file("file", path.as_ref())])),
        )
    }

    /// Ask the service to upload a directory it can reach by `dir_path`.
    pub fn build_upload_directory(&self, dir_path: &str) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            "/files/directory",
            Some(RequestBody::Json(json!({ "dirPath": dir_path }))),
        )
    }

    /// Upload a set of files as one linked directory graph.
    ///
    /// Inline entries are named `files[i][path]` / `files[i][content]` where
    /// `i` is the entry's position in `entries`. Local files are always sent
    /// under the bare name `files`; the service relies on this naming.
    pub fn build_upload_directory_dag(
        &self,
        entries: &[FileEntry],
        dir_name: Option<&str>,
    ) -> HttpRequest {
        let mut parts = Vec::with_capacity(entries.len() * 2 + 1);
        if let Some(dir_name) = dir_name {
            parts.push(Part::text("dirName", dir_name));
        }
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                FileEntry::PathAndContent { path, content } => {
                    parts.push(Part::text(format!("files[{index}][path]"), path.as_str()));
                    parts.push(Part::text(format!("files[{index}][content]"), content.as_str()));
                }
                FileEntry::LocalFilePath(path) => parts.push(Part::file("files", path.as_path())),
            }
        }
        self.request(
            HttpMethod::Post,
            "/files/directory-dag",
            Some(RequestBody::Multipart(parts)),
        )
    }

    pub fn build_rename_file(&self, upload_id: &str, new_name: &str) -> HttpRequest {
        self.request(
            HttpMethod::Put,
            &format!("/files/rename/{upload_id}"),
            Some(RequestBody::Json(json!({ "newName": new_name }))),
        )
    }

    pub fn build_pin_cid(&self, cid: &str, filename: Option<&str>) -> HttpRequest {
        let body = match filename {
            Some(filename) => json!({ "filename": filename }),
            None => json!({}),
        };
        self.request(
            HttpMethod::Post,
            &format!("/files/pin/{cid}"),
            Some(RequestBody::Json(body)),
        )
    }

    pub fn build_remove_file(&self, cid: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/files/remove/{cid}"), None)
    }

    pub fn build_list_uploads(&self, pagination: Pagination) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/users/me/uploads", None);
        req.query = vec![
            ("page".to_string(), pagination.page.to_string()),
            ("limit".to_string(), pagination.limit.to_string()),
        ];
        req
    }

    // -----------------------------------------------------------------------
    // Tokens
    // -----------------------------------------------------------------------

    pub fn build_generate_token(&self, name: &str, options: &TokenOptions) -> HttpRequest {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::from(name));
        if let Some(permissions) = &options.permissions {
            body.insert("permissions".to_string(), Value::from(permissions.clone()));
        }
        if let Some(days) = options.expires_in_days {
            body.insert("expiresInDays".to_string(), Value::from(days));
        }
        if let Some(allowlist) = &options.ip_allowlist {
            body.insert("ipAllowlist".to_string(), Value::from(allowlist.clone()));
        }
        self.request(
            HttpMethod::Post,
            "/tokens/generate",
            Some(RequestBody::Json(Value::Object(body))),
        )
    }

    pub fn build_list_tokens(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/tokens/list", None)
    }

    pub fn build_revoke_token(&self, name: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/tokens/revoke/{name}"), None)
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    pub fn build_get_status(&self, cid: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/status/{cid}"), None)
    }

    pub fn build_get_allocations(&self, cid: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/status/allocations/{cid}"), None)
    }

    // -----------------------------------------------------------------------
    // Executing operations
    // -----------------------------------------------------------------------

    pub fn upload_file(&self, path: impl AsRef<Path>) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_upload_file(path))
    }

    pub fn upload_directory(&self, dir_path: &str) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_upload_directory(dir_path))
    }

    pub fn upload_directory_dag(
        &self,
        entries: &[FileEntry],
        dir_name: Option<&str>,
    ) -> Result<T::Response, T::Error> {
        self.transport
            .execute(self.build_upload_directory_dag(entries, dir_name))
    }

    pub fn rename_file(&self, upload_id: &str, new_name: &str) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_rename_file(upload_id, new_name))
    }

    pub fn pin_cid(&self, cid: &str, filename: Option<&str>) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_pin_cid(cid, filename))
    }

    pub fn remove_file(&self, cid: &str) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_remove_file(cid))
    }

    pub fn list_uploads(&self, pagination: Pagination) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_list_uploads(pagination))
    }

    pub fn generate_token(
        &self,
        name: &str,
        options: &TokenOptions,
    ) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_generate_token(name, options))
    }

    pub fn list_tokens(&self) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_list_tokens())
    }

    pub fn revoke_token(&self, name: &str) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_revoke_token(name))
    }

    pub fn get_status(&self, cid: &str) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_get_status(cid))
    }

    pub fn get_allocations(&self, cid: &str) -> Result<T::Response, T::Error> {
        self.transport.execute(self.build_get_allocations(cid))
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<RequestBody>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url()),
            query: Vec::new(),
            headers: self.auth_headers(),
            body,
        }
    }

    /// Bearer auth is the only scheme the service accepts.
    fn auth_headers(&self) -> Vec<(String, String)> {
        match self.config.credential() {
            Some(credential) => vec![(
                "Authorization".to_string(),
                format!("Bearer {credential}"),
            )],
            None => Vec::new(),
        }
    }
}

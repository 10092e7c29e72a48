//! Pin and token lifecycles against the live mock server.
//!
//! # Design
//! Requests come from `PinClient::build_*` and are executed by a ureq host
//! executor, so this checks that the plain-data requests are complete enough
//! for any HTTP stack to send. Multipart bodies are covered by
//! `tests/transport.rs`.

mod common;

use pinhub_client::{
    ClientConfig, HttpMethod, HttpRequest, HttpResponse, Pagination, PinClient, ReqwestTransport,
    TokenOptions,
};

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data rather than `Err`.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    assert!(req.parts().is_none(), "multipart is not handled by this executor");
    let url = req.url_with_query();
    let body = req.json_body().map(|v| v.to_string());

    let mut response = match (req.method, body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&url), &req.headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&url), &req.headers).call(),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(&url), &req.headers)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => with_headers(agent.post(&url), &req.headers).send_empty(),
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(&url), &req.headers)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => with_headers(agent.put(&url), &req.headers).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn client(base_url: &str) -> PinClient<ReqwestTransport> {
    PinClient::new(
        ClientConfig::new()
            .with_base_url(base_url)
            .with_credential("integration-key"),
    )
    .unwrap()
}

#[test]
fn pin_lifecycle() {
    let base_url = common::spawn_server();
    let client = client(&base_url);

    // Step 1: nothing uploaded yet.
    let resp = execute(client.build_list_uploads(Pagination::default()));
    assert_eq!(resp.status, 200);
    let page: serde_json::Value = resp.json().unwrap();
    assert_eq!(page["total"], 0);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 10);

    // Step 2: pin a cid with a filename.
    let resp = execute(client.build_pin_cid("QmLife", Some("doc.pdf")));
    assert_eq!(resp.status, 201);
    let pinned: serde_json::Value = resp.json().unwrap();
    assert_eq!(pinned["cid"], "QmLife");
    assert_eq!(pinned["name"], "doc.pdf");
    let upload_id = pinned["id"].as_str().unwrap().to_string();

    // Step 3: server-resolved directory upload.
    let resp = execute(client.build_upload_directory("/srv/site"));
    assert_eq!(resp.status, 201);
    let dir: serde_json::Value = resp.json().unwrap();
    assert_eq!(dir["name"], "/srv/site");

    // Step 4: rename the pinned upload.
    let resp = execute(client.build_rename_file(&upload_id, "renamed.pdf"));
    assert_eq!(resp.status, 200);
    let renamed: serde_json::Value = resp.json().unwrap();
    assert_eq!(renamed["name"], "renamed.pdf");

    // Step 5: list with a custom page size.
    let resp = execute(client.build_list_uploads(Pagination::new(1, 1)));
    let page: serde_json::Value = resp.json().unwrap();
    assert_eq!(page["total"], 2);
    assert_eq!(page["uploads"].as_array().unwrap().len(), 1);

    // Step 6: status and allocations.
    let resp = execute(client.build_get_status("QmLife"));
    assert_eq!(resp.status, 200);
    let status: serde_json::Value = resp.json().unwrap();
    assert_eq!(status["status"], "pinned");

    let resp = execute(client.build_get_allocations("QmLife"));
    assert_eq!(resp.status, 200);

    // Step 7: remove, then status is gone.
    let resp = execute(client.build_remove_file("QmLife"));
    assert_eq!(resp.status, 204);
    let resp = execute(client.build_get_status("QmLife"));
    assert_eq!(resp.status, 404);

    // Step 8: removing again passes the 404 straight through.
    let resp = execute(client.build_remove_file("QmLife"));
    assert_eq!(resp.status, 404);
}

#[test]
fn token_lifecycle() {
    let base_url = common::spawn_server();
    let client = client(&base_url);

    let options = TokenOptions {
        permissions: Some(vec!["pin".to_string()]),
        expires_in_days: Some(30),
        ip_allowlist: None,
    };
    let resp = execute(client.build_generate_token("ci", &options));
    assert_eq!(resp.status, 201);
    let token: serde_json::Value = resp.json().unwrap();
    assert_eq!(token["name"], "ci");
    assert_eq!(token["permissions"], serde_json::json!(["pin"]));
    assert_eq!(token["expiresInDays"], 30);
    assert!(token["token"].is_string());

    let resp = execute(client.build_list_tokens());
    let tokens: Vec<serde_json::Value> = resp.json().unwrap();
    assert_eq!(tokens.len(), 1);

    let resp = execute(client.build_revoke_token("ci"));
    assert_eq!(resp.status, 204);

    let resp = execute(client.build_revoke_token("ci"));
    assert_eq!(resp.status, 404);
}

#[test]
fn missing_credential_is_rejected_by_service() {
    let base_url = common::spawn_server();
    let anonymous = PinClient::new(ClientConfig::new().with_base_url(&base_url)).unwrap();

    let resp = execute(anonymous.build_list_tokens());
    assert_eq!(resp.status, 401);
}

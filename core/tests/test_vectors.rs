//! Verify `build_*` methods against the JSON vectors in `test-vectors/`.
//!
//! Each case names an operation, its arguments, and the request it must
//! produce. Bodies are compared as parsed JSON so key order does not matter.

use pinhub_client::{
    ClientConfig, HttpMethod, HttpRequest, Pagination, PinClient, ReqwestTransport, TokenOptions,
};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args[key]
        .as_str()
        .unwrap_or_else(|| panic!("missing string arg {key}"))
}

fn build(client: &PinClient<ReqwestTransport>, operation: &str, args: &Value) -> HttpRequest {
    match operation {
        "upload_directory" => client.build_upload_directory(str_arg(args, "dir_path")),
        "rename_file" => {
            client.build_rename_file(str_arg(args, "upload_id"), str_arg(args, "new_name"))
        }
        "pin_cid" => client.build_pin_cid(str_arg(args, "cid"), args["filename"].as_str()),
        "remove_file" => client.build_remove_file(str_arg(args, "cid")),
        "list_uploads" => {
            let mut pagination = Pagination::default();
            if let Some(page) = args["page"].as_u64() {
                pagination.page = page as u32;
            }
            if let Some(limit) = args["limit"].as_u64() {
                pagination.limit = limit as u32;
            }
            client.build_list_uploads(pagination)
        }
        "generate_token" => {
            let options: TokenOptions = serde_json::from_value(args["options"].clone()).unwrap();
            client.build_generate_token(str_arg(args, "name"), &options)
        }
        "list_tokens" => client.build_list_tokens(),
        "revoke_token" => client.build_revoke_token(str_arg(args, "name")),
        "get_status" => client.build_get_status(str_arg(args, "cid")),
        "get_allocations" => client.build_get_allocations(str_arg(args, "cid")),
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let base_url = vectors["base_url"].as_str().unwrap();
    let credential = vectors["credential"].as_str().unwrap();
    let client = PinClient::new(
        ClientConfig::new()
            .with_base_url(base_url)
            .with_credential(credential),
    )
    .unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&client, case["operation"].as_str().unwrap(), &case["args"]);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: url");

        let expected_query: Vec<(String, String)> = serde_json::from_value(expected["query"].clone()).unwrap();
        assert_eq!(req.query, expected_query, "{name}: query");

        assert_eq!(
            req.headers,
            vec![("Authorization".to_string(), format!("Bearer {credential}"))],
            "{name}: headers"
        );

        match &expected["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            body => assert_eq!(req.json_body(), Some(body), "{name}: body"),
        }
    }
}

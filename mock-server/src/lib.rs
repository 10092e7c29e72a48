use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Upload {
    pub id: String,
    pub cid: String,
    pub name: String,
    pub size: u64,
}

/// One multipart field as the server received it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedPart {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub size: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DagUpload {
    pub cid: String,
    pub dir_name: Option<String>,
    pub parts: Vec<ReceivedPart>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub permissions: Vec<String>,
    pub expires_in_days: Option<u32>,
    pub ip_allowlist: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadPage {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub uploads: Vec<Upload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDirectory {
    pub dir_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFile {
    pub new_name: String,
}

#[derive(Deserialize)]
pub struct PinCid {
    pub filename: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateToken {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub expires_in_days: Option<u32>,
    #[serde(default)]
    pub ip_allowlist: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Default)]
pub struct Store {
    pub uploads: Vec<Upload>,
    pub tokens: Vec<Token>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/files", post(upload_file))
        .route("/files/directory", post(upload_directory))
        .route("/files/directory-dag", post(upload_directory_dag))
        .route("/files/rename/{upload_id}", put(rename_file))
        .route("/files/pin/{cid}", post(pin_cid))
        .route("/files/remove/{cid}", delete(remove_file))
        .route("/users/me/uploads", get(list_uploads))
        .route("/tokens/generate", post(generate_token))
        .route("/tokens/list", get(list_tokens))
        .route("/tokens/revoke/{name}", delete(revoke_token))
        .route("/status/{cid}", get(get_status))
        .route("/status/allocations/{cid}", get(get_allocations))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock pinning API listening");
    axum::serve(listener, app()).await
}

/// Every route except `/status/*` needs `Authorization: Bearer <non-empty>`.
fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

fn fake_cid() -> String {
    format!("Qm{}", Uuid::new_v4().simple())
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<ReceivedPart>, StatusCode> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        let value = match file_name {
            Some(_) => None,
            None => Some(String::from_utf8_lossy(&bytes).into_owned()),
        };
        parts.push(ReceivedPart {
            name,
            value,
            file_name,
            size: bytes.len() as u64,
        });
    }
    Ok(parts)
}

async fn upload_file(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Upload>), StatusCode> {
    authorize(&headers)?;
    let parts = read_parts(multipart).await?;
    let file = parts
        .into_iter()
        .find(|p| p.name == "file" && p.file_name.is_some())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let upload = Upload {
        id: Uuid::new_v4().to_string(),
        cid: fake_cid(),
        name: file.file_name.unwrap_or_default(),
        size: file.size,
    };
    db.write().await.uploads.push(upload.clone());
    Ok((StatusCode::CREATED, Json(upload)))
}

async fn upload_directory(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UploadDirectory>,
) -> Result<(StatusCode, Json<Upload>), StatusCode> {
    authorize(&headers)?;
    let upload = Upload {
        id: Uuid::new_v4().to_string(),
        cid: fake_cid(),
        name: input.dir_path,
        size: 0,
    };
    db.write().await.uploads.push(upload.clone());
    Ok((StatusCode::CREATED, Json(upload)))
}

async fn upload_directory_dag(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DagUpload>), StatusCode> {
    authorize(&headers)?;
    let parts = read_parts(multipart).await?;
    let dir_name = parts
        .iter()
        .find(|p| p.name == "dirName")
        .and_then(|p| p.value.clone());
    let dag = DagUpload {
        cid: fake_cid(),
        dir_name,
        parts,
    };
    db.write().await.uploads.push(Upload {
        id: Uuid::new_v4().to_string(),
        cid: dag.cid.clone(),
        name: dag.dir_name.clone().unwrap_or_default(),
        size: dag.parts.iter().map(|p| p.size).sum(),
    });
    Ok((StatusCode::CREATED, Json(dag)))
}

async fn rename_file(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(upload_id): Path<String>,
    Json(input): Json<RenameFile>,
) -> Result<Json<Upload>, StatusCode> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let upload = store
        .uploads
        .iter_mut()
        .find(|u| u.id == upload_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    upload.name = input.new_name;
    Ok(Json(upload.clone()))
}

async fn pin_cid(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(cid): Path<String>,
    Json(input): Json<PinCid>,
) -> Result<(StatusCode, Json<Upload>), StatusCode> {
    authorize(&headers)?;
    let upload = Upload {
        id: Uuid::new_v4().to_string(),
        name: input.filename.unwrap_or_else(|| cid.clone()),
        cid,
        size: 0,
    };
    db.write().await.uploads.push(upload.clone());
    Ok((StatusCode::CREATED, Json(upload)))
}

async fn remove_file(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(cid): Path<String>,
) -> Result<StatusCode, StatusCode> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let before = store.uploads.len();
    store.uploads.retain(|u| u.cid != cid);
    if store.uploads.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_uploads(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<UploadPage>, StatusCode> {
    authorize(&headers)?;
    let store = db.read().await;
    let skip = params.page.saturating_sub(1) as usize * params.limit as usize;
    let uploads = store
        .uploads
        .iter()
        .skip(skip)
        .take(params.limit as usize)
        .cloned()
        .collect();
    Ok(Json(UploadPage {
        page: params.page,
        limit: params.limit,
        total: store.uploads.len(),
        uploads,
    }))
}

async fn generate_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<GenerateToken>,
) -> Result<(StatusCode, Json<Token>), StatusCode> {
    authorize(&headers)?;
    let mut store = db.write().await;
    if store.tokens.iter().any(|t| t.name == input.name) {
        return Err(StatusCode::CONFLICT);
    }
    let token = Token {
        name: input.name,
        token: Some(Uuid::new_v4().simple().to_string()),
        permissions: input.permissions,
        expires_in_days: input.expires_in_days,
        ip_allowlist: input.ip_allowlist,
    };
    store.tokens.push(Token {
        token: None,
        ..token.clone()
    });
    Ok((StatusCode::CREATED, Json(token)))
}

async fn list_tokens(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Token>>, StatusCode> {
    authorize(&headers)?;
    Ok(Json(db.read().await.tokens.clone()))
}

async fn revoke_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<StatusCode, StatusCode> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let before = store.tokens.len();
    store.tokens.retain(|t| t.name != name);
    if store.tokens.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_status(
    State(db): State<Db>,
    Path(cid): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let store = db.read().await;
    if !store.uploads.iter().any(|u| u.cid == cid) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({ "cid": cid, "status": "pinned" })))
}

async fn get_allocations(
    State(db): State<Db>,
    Path(cid): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let store = db.read().await;
    if !store.uploads.iter().any(|u| u.cid == cid) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({
        "cid": cid,
        "allocations": [
            { "peer": "peer-1", "status": "pinned" },
            { "peer": "peer-2", "status": "pinned" }
        ]
    })))
}

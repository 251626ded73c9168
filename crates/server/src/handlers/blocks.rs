//! Block upload handlers.
//!
//! The three entry points sequence one block upload: create a session,
//! stream in block files, then complete by persisting the sanitized
//! metadata descriptor. Each call is stateless; session state is re-derived
//! from the object store every time.

use crate::auth::tenant_from_headers;
use crate::error::{ApiError, ApiResult};
use crate::sanitize::sanitize_meta;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use futures::TryStreamExt;
use strata_core::{BlockMeta, META_FILENAME, validate_block_file_path};
use strata_storage::{Payload, StorageError, TenantStore};

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Extract a raw (still percent-encoded) query parameter value.
fn raw_query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then_some(value)
    })
}

/// Decode a percent-encoded query value, rejecting malformed escapes.
///
/// Every `%` must be followed by exactly two hex digits, `+` decodes to a
/// space, and the decoded bytes must be valid UTF-8. Returns None for any
/// violation; decoding never passes malformed input through unchanged.
fn unescape(value: &str) -> Option<String> {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = hex_val(*bytes.get(i + 1)?)?;
                let lo = hex_val(*bytes.get(i + 2)?)?;
                out.push(hi << 4 | lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).ok()
}

/// Adapt a request body into a sized payload without buffering it.
fn request_payload(req: Request, len: u64) -> Payload {
    let stream = req
        .into_body()
        .into_data_stream()
        .map_err(|e| StorageError::Io(std::io::Error::other(e)));
    Payload::new(len, Box::pin(stream))
}

/// POST /api/v1/upload/block/{block} - Create a block upload session.
#[tracing::instrument(skip(state, headers), fields(block = %block))]
pub async fn create_block_upload(
    State(state): State<AppState>,
    Path(block): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    if block.is_empty() {
        return Err(ApiError::BadRequest("missing block ID".to_string()));
    }
    let tenant = tenant_from_headers(&headers)?;

    tracing::debug!(tenant = %tenant, "creating block upload session");

    let store = TenantStore::new(state.storage.clone(), tenant);
    state.sessions.open(&store, &block).await?;

    Ok(StatusCode::OK)
}

/// POST /api/v1/upload/block/{block}/files?path={path} - Upload a block file.
#[tracing::instrument(skip(state, req), fields(block = %block))]
pub async fn upload_block_file(
    State(state): State<AppState>,
    Path(block): Path<String>,
    req: Request,
) -> ApiResult<StatusCode> {
    if block.is_empty() {
        return Err(ApiError::BadRequest("missing block ID".to_string()));
    }
    // Decode the path parameter strictly: a malformed escape is its own
    // failure, distinct from a path the whitelist rejects.
    let raw_path = raw_query_param(req.uri().query().unwrap_or(""), "path");
    let path = match raw_path {
        Some(raw) => unescape(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("malformed file path: {raw:?}")))?,
        None => String::new(),
    };
    if path.is_empty() {
        return Err(ApiError::BadRequest("missing file path".to_string()));
    }
    let tenant = tenant_from_headers(req.headers())?;

    validate_block_file_path(&path).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let Some(len) = declared_length(req.headers()).filter(|len| *len > 0) else {
        return Err(ApiError::BadRequest("file cannot be empty".to_string()));
    };

    let store = TenantStore::new(state.storage.clone(), tenant);
    if !state.sessions.is_open(&store, &block).await? {
        tracing::debug!("no lock object exists for block, refusing file upload");
        return Err(ApiError::SessionNotOpen);
    }

    let dst = format!("{block}/{path}");
    tracing::debug!(tenant = %store.tenant(), destination = %dst, size = len, "uploading block file");

    let payload = request_payload(req, len);
    store.put(&dst, payload).await?;

    tracing::debug!(tenant = %store.tenant(), path = %dst, "finished uploading block file");

    Ok(StatusCode::OK)
}

/// POST /api/v1/upload/block/{block}/finish - Complete a block upload.
#[tracing::instrument(skip(state, req), fields(block = %block))]
pub async fn complete_block_upload(
    State(state): State<AppState>,
    Path(block): Path<String>,
    req: Request,
) -> ApiResult<StatusCode> {
    if block.is_empty() {
        return Err(ApiError::BadRequest("missing block ID".to_string()));
    }
    let tenant = tenant_from_headers(req.headers())?;

    tracing::debug!(
        tenant = %tenant,
        content_length = declared_length(req.headers()),
        "received request to complete block upload"
    );

    let body = axum::body::to_bytes(req.into_body(), state.config.server.max_meta_body_bytes)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read request body: {e}")))?;
    let meta: BlockMeta = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("malformed request body".to_string()))?;

    let store = TenantStore::new(state.storage.clone(), tenant);
    if !state.sessions.is_open(&store, &block).await? {
        tracing::debug!("no lock object exists for block, refusing to complete block");
        return Err(ApiError::SessionNotOpen);
    }

    tracing::debug!(tenant = %store.tenant(), files = meta.files.len(), "completing block upload");

    let (meta, _updated) = sanitize_meta(meta, &block, store.tenant())
        .map_err(|e| ApiError::Internal(format!("failed to sanitize block metadata: {e}")))?;

    let encoded = serde_json::to_vec(&meta)
        .map_err(|e| ApiError::Internal(format!("failed to encode block metadata: {e}")))?;

    // Writing the descriptor is the commit point: the block becomes visible
    // to readers the moment this put lands.
    let dst = format!("{block}/{META_FILENAME}");
    tracing::debug!(destination = %dst, "writing block metadata descriptor");
    store.put(&dst, Payload::from_bytes(encoded.into())).await?;

    // Cleanup failures after the commit must not read as a failed upload;
    // they get their own response code.
    let report = state.sessions.close(&store, &block).await?;
    if report.failed > 0 {
        return Err(ApiError::LockCleanup {
            deleted: report.deleted,
            failed: report.failed,
        });
    }

    tracing::debug!("successfully completed block upload");

    Ok(StatusCode::OK)
}

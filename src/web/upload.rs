//! Multipart ingestion endpoint.
//!
//! `POST /api/upload` - accepts one file part named `file`, parses it with
//! the tolerant row parser, and runs the transactional catalog ingestion for
//! the authenticated tenant. Extractor order matters: [`CurrentTenant`]
//! resolves before the multipart body is consumed, so an unauthenticated
//! request is rejected before a single row is read.

use crate::{
    core::{
        ingest,
        parser::{self, UploadFormat},
    },
    errors::Error,
    web::{
        AppState,
        auth::CurrentTenant,
        error::{ApiError, ApiResult},
    },
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Upload response body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always true on a 200 response
    pub success: bool,
    /// Number of products ingested
    pub products_count: usize,
}

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: axum::body::Bytes,
}

async fn file_part(multipart: &mut Multipart) -> ApiResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(Error::InvalidRequest {
            message: format!("malformed multipart body: {e}"),
        })
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let data = field.bytes().await.map_err(|e| {
            ApiError(Error::InvalidRequest {
                message: format!("failed to read upload: {e}"),
            })
        })?;
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}

/// `POST /api/upload` - parse, derive, and persist one uploaded catalog.
pub async fn upload(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let file = file_part(&mut multipart)
        .await?
        .ok_or(Error::MissingFile)?;

    let format = UploadFormat::detect(file.file_name.as_deref(), file.content_type.as_deref());
    let rows = parser::parse_upload(format, &file.data)?;
    if rows.is_empty() {
        return Err(Error::NoValidRows.into());
    }

    let count = ingest::replace_catalog(&state.db, tenant.id, &rows, &state.ingest).await?;
    info!(
        tenant_id = tenant.id,
        products = count,
        file = file.file_name.as_deref().unwrap_or("<unnamed>"),
        "upload ingested"
    );

    Ok(Json(UploadResponse {
        success: true,
        products_count: count,
    }))
}

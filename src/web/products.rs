//! Catalog query endpoints.
//!
//! `GET /api/products` and `GET /api/products/{id}`, both scoped to the
//! authenticated tenant.

use crate::{
    core::catalog::{self, ProductDetail, ProductSummary},
    errors::Error,
    web::{AppState, auth::CurrentTenant, error::ApiResult},
};
use axum::{
    Json,
    extract::{Path, State},
};

/// `GET /api/products` - the caller's products, id and name only, ordered
/// by id ascending.
pub async fn list(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
) -> ApiResult<Json<Vec<ProductSummary>>> {
    let products = catalog::list_products(&state.db, tenant.id).await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` - one product's full derived history. A product
/// owned by another tenant 404s exactly like a missing one.
pub async fn detail(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let detail = catalog::get_product_detail(&state.db, tenant.id, &product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    Ok(Json(detail))
}

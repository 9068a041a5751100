//! Insights endpoint.
//!
//! `POST /api/ai/insights` - forwards the selected products' derived data to
//! the completions collaborator. Failures here are reported with distinct
//! statuses and never affect ingestion or chart data.

use crate::{
    core::{catalog::ProductDetail, insights::InsightsReport},
    errors::Error,
    web::{AppState, error::ApiResult},
};
use axum::{Json, extract::State};
use serde::Deserialize;

/// Insights request body: the products (with history) to analyze.
#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    /// Products selected on the dashboard
    #[serde(default)]
    pub products: Vec<ProductDetail>,
}

/// `POST /api/ai/insights` - generate free-text insights for the selection.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<InsightsRequest>,
) -> ApiResult<Json<InsightsReport>> {
    if request.products.is_empty() {
        return Err(Error::InvalidRequest {
            message: "No product data provided".to_string(),
        }
        .into());
    }

    let client = state.insights.as_ref().ok_or(Error::InsightsUnavailable {
        message: "insights API key not configured".to_string(),
    })?;

    let report = client.generate(&request.products).await?;
    Ok(Json(report))
}

//! Tenant-scoped catalog queries.
//!
//! Read-side counterpart of the ingestion pipeline: everything the dashboard
//! needs, always filtered by the owning tenant. Serialized field names are
//! camelCase to match the dashboard's existing JSON contract.

use crate::{
    entities::{DailyRecord, Product, daily_record, product},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};

/// Minimal product listing entry (id + name only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Product identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// One day of derived history as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Day number, 1 through 3
    pub day: i32,
    /// Running inventory after this day
    pub inventory: i64,
    /// Procurement spend for the day (qty x unit price)
    pub procurement_amount: f64,
    /// Sales revenue for the day (qty x unit price)
    pub sales_amount: f64,
    /// Units procured
    pub procurement_qty: i64,
    /// Procurement unit price
    pub procurement_price: f64,
    /// Units sold
    pub sales_qty: i64,
    /// Sales unit price
    pub sales_price: f64,
}

/// A product plus its full derived history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    /// Product identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Inventory on hand before day 1
    pub opening_inventory: i64,
    /// Daily records ordered by day ascending
    pub history: Vec<HistoryPoint>,
}

impl HistoryPoint {
    fn from_record(record: &daily_record::Model) -> Self {
        Self {
            day: record.day,
            inventory: record.inventory,
            procurement_amount: record.procurement_qty as f64 * record.procurement_price,
            sales_amount: record.sales_qty as f64 * record.sales_price,
            procurement_qty: record.procurement_qty,
            procurement_price: record.procurement_price,
            sales_qty: record.sales_qty,
            sales_price: record.sales_price,
        }
    }
}

/// Lists the tenant's products (id and name only), ordered by id ascending.
pub async fn list_products(
    db: &DatabaseConnection,
    tenant_id: i64,
) -> Result<Vec<ProductSummary>> {
    let products = Product::find()
        .filter(product::Column::UserId.eq(tenant_id))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;

    Ok(products
        .into_iter()
        .map(|p| ProductSummary {
            id: p.id,
            name: p.name,
        })
        .collect())
}

/// Fetches one product's full derived history, scoped to the tenant.
///
/// Returns `None` when the product does not exist for this tenant - a
/// product owned by someone else is indistinguishable from one that was
/// never uploaded.
pub async fn get_product_detail(
    db: &DatabaseConnection,
    tenant_id: i64,
    product_id: &str,
) -> Result<Option<ProductDetail>> {
    let Some(product) = Product::find_by_id((tenant_id, product_id.to_string()))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let records = DailyRecord::find()
        .filter(daily_record::Column::UserId.eq(tenant_id))
        .filter(daily_record::Column::ProductId.eq(product_id))
        .order_by_asc(daily_record::Column::Day)
        .all(db)
        .await?;

    Ok(Some(ProductDetail {
        id: product.id,
        name: product.name,
        opening_inventory: product.opening_inventory,
        history: records.iter().map(HistoryPoint::from_record).collect(),
    }))
}

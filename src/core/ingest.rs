//! Transactional catalog ingestion.
//!
//! Persists one parsed upload for one tenant as a single atomic unit. The
//! policy is per-product upsert keyed by (tenant, product id): an uploaded
//! product updates its name and opening inventory and fully regenerates its
//! three daily records; products the upload does not mention are left
//! untouched. Either every product in the batch commits or none does - a
//! failed or timed-out run leaves the tenant's prior catalog exactly as it
//! was.

use crate::{
    config::settings::IngestSettings,
    core::{inventory, parser::ProductRow},
    errors::{Error, Result},
    entities::{DailyRecord, Product, daily_record, product},
};
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Ingests a batch of parsed rows for one tenant, replacing per-product state.
///
/// The whole run executes inside one database transaction wrapped in the
/// configured execution budget; on expiry the transaction is dropped and
/// rolled back. Returns the number of products processed.
///
/// # Errors
/// Returns an error if the transaction cannot be acquired, any write fails,
/// or the execution budget is exceeded. In all cases nothing is persisted.
pub async fn replace_catalog(
    db: &DatabaseConnection,
    tenant_id: i64,
    rows: &[ProductRow],
    settings: &IngestSettings,
) -> Result<usize> {
    let work = apply_batch(db, tenant_id, rows);

    match tokio::time::timeout(settings.execution_timeout(), work).await {
        Ok(result) => {
            let count = result?;
            info!(tenant_id, products = count, "catalog ingestion committed");
            Ok(count)
        }
        Err(_) => Err(Error::IngestTimeout {
            seconds: settings.execution_timeout_seconds,
        }),
    }
}

async fn apply_batch(
    db: &DatabaseConnection,
    tenant_id: i64,
    rows: &[ProductRow],
) -> Result<usize> {
    // Use a transaction to ensure atomicity across the whole batch
    let txn = db.begin().await?;

    for row in rows {
        upsert_product(&txn, tenant_id, row).await?;
    }

    txn.commit().await?;
    Ok(rows.len())
}

/// Upserts one product and regenerates its daily records.
///
/// Existing records are deleted rather than patched: the derived history is
/// a pure function of the uploaded row, so partial updates have no meaning.
async fn upsert_product<C>(conn: &C, tenant_id: i64, row: &ProductRow) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = Product::find_by_id((tenant_id, row.id.clone()))
        .one(conn)
        .await?;

    if let Some(model) = existing {
        let mut active: product::ActiveModel = model.into();
        active.name = Set(row.name.clone());
        active.opening_inventory = Set(row.opening_inventory);
        active.update(conn).await?;

        DailyRecord::delete_many()
            .filter(daily_record::Column::UserId.eq(tenant_id))
            .filter(daily_record::Column::ProductId.eq(row.id.as_str()))
            .exec(conn)
            .await?;
    } else {
        let new_product = product::ActiveModel {
            user_id: Set(tenant_id),
            id: Set(row.id.clone()),
            name: Set(row.name.clone()),
            opening_inventory: Set(row.opening_inventory),
        };
        new_product.insert(conn).await?;
    }

    let records = inventory::derive_history(row)
        .into_iter()
        .map(|snapshot| daily_record::ActiveModel {
            user_id: Set(tenant_id),
            product_id: Set(row.id.clone()),
            day: Set(snapshot.day),
            procurement_qty: Set(snapshot.procurement_qty),
            procurement_price: Set(snapshot.procurement_price),
            sales_qty: Set(snapshot.sales_qty),
            sales_price: Set(snapshot.sales_price),
            inventory: Set(snapshot.inventory),
            ..Default::default()
        });
    DailyRecord::insert_many(records).exec(conn).await?;

    Ok(())
}

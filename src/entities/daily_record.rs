//! Daily record entity - One derived inventory snapshot per product per day.
//!
//! Records are never supplied by the user directly; they are regenerated in
//! full from the uploaded row on every ingestion. `inventory` carries the
//! running balance and may be negative (stockout/overcommit is a valid
//! business state).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning user (first half of the parent product key)
    pub user_id: i64,
    /// Product identifier (second half of the parent product key)
    pub product_id: String,
    /// Day number within the window, 1 through 3
    pub day: i32,
    /// Units procured on this day
    pub procurement_qty: i64,
    /// Unit price paid for procurement on this day
    pub procurement_price: f64,
    /// Units sold on this day
    pub sales_qty: i64,
    /// Unit price charged for sales on this day
    pub sales_price: f64,
    /// Running inventory after this day's procurement and sales
    pub inventory: i64,
}

/// Defines relationships between `DailyRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one product, keyed by (`user_id`, `product_id`)
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "(Column::UserId, Column::ProductId)",
        to = "(super::product::Column::UserId, super::product::Column::Id)",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Product entity - A catalog item owned by exactly one tenant.
//!
//! The primary key is composite: (`user_id`, `id`). The same spreadsheet
//! product id can therefore exist independently for different tenants, and
//! every lookup must supply both halves of the key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// ID of the owning user (first half of the composite key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Product identifier from the uploaded file (second half of the key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the product
    pub name: String,
    /// Inventory on hand before day 1
    pub opening_inventory: i64,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One product has exactly three daily records
    #[sea_orm(has_many = "super::daily_record::Entity")]
    DailyRecords,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::daily_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

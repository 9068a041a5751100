//! User entity - Represents a tenant account.
//!
//! Each user owns an isolated product catalog. Products and daily records
//! are always scoped by `user_id`; no query path crosses tenants.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, unique across the system
    #[sea_orm(unique)]
    pub email: String,
    /// Bcrypt hash of the user's password
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    /// One user can hold many active sessions
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

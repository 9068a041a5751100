//! Session entity - Opaque bearer tokens mapping requests to tenants.
//!
//! A session is created at login and revoked at logout. Expired sessions
//! resolve to no tenant; they are not proactively reaped.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Opaque token presented by the client as a bearer credential
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    /// ID of the user this session authenticates
    pub user_id: i64,
    /// When the session was created
    pub created_at: DateTime,
    /// When the session stops resolving to a tenant
    pub expires_at: DateTime,
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Bootstrap tenant seeding from environment variables.
//!
//! On a fresh deployment there is no way to log in, so startup can seed one
//! tenant from `BOOTSTRAP_EMAIL` and `BOOTSTRAP_PASSWORD`. Seeding is
//! skipped when either variable is absent or the account already exists.

use crate::{
    core::account,
    entities::{User, user},
    errors::Result,
};
use sea_orm::prelude::*;

/// Ensures the bootstrap tenant exists, creating it if necessary.
///
/// # Returns
/// * `Ok(Some(user))` - A new tenant was created
/// * `Ok(None)` - Seeding skipped (env vars unset, or account exists)
pub async fn seed_bootstrap_user(db: &DatabaseConnection) -> Result<Option<user::Model>> {
    let (Ok(email), Ok(password)) = (
        std::env::var("BOOTSTRAP_EMAIL"),
        std::env::var("BOOTSTRAP_PASSWORD"),
    ) else {
        return Ok(None);
    };

    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    let created = account::create_user(db, email, &password).await?;
    Ok(Some(created))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    // BOOTSTRAP_* env vars are process-global, so these tests only cover the
    // unset path; the seeded path is exercised through core::account tests.
    #[tokio::test]
    async fn test_seed_skipped_without_env() -> Result<()> {
        let db = setup_test_db().await?;
        if std::env::var("BOOTSTRAP_EMAIL").is_err() {
            let seeded = seed_bootstrap_user(&db).await?;
            assert!(seeded.is_none());
        }
        Ok(())
    }
}

//! Tenant credential and session operations.
//!
//! The thin credential layer the ingestion endpoint's tenant check sits on:
//! bcrypt-hashed passwords, opaque session tokens with a configurable
//! lifetime. Lookup failures and wrong passwords are deliberately collapsed
//! into one error so responses don't reveal which emails exist.

use crate::{
    entities::{Session, User, session, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use std::time::Duration;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Creates a new tenant account with a bcrypt-hashed password.
///
/// # Errors
/// Returns an error if:
/// - The email is empty or whitespace-only
/// - The password is shorter than the minimum
/// - The email is already registered (database unique constraint)
pub async fn create_user(
    db: &DatabaseConnection,
    email: String,
    password: &str,
) -> Result<user::Model> {
    let email = email.trim().to_string();
    if email.is_empty() {
        return Err(Error::InvalidRequest {
            message: "Email cannot be empty".to_string(),
        });
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(Error::InvalidRequest {
            message: format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        });
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let now = chrono::Utc::now().naive_utc();

    let new_user = user::ActiveModel {
        email: Set(email),
        password_hash: Set(password_hash),
        created_at: Set(now),
        ..Default::default()
    };
    new_user.insert(db).await.map_err(Into::into)
}

/// Verifies an email/password pair against the stored hash.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] for an unknown email or a wrong
/// password - the two cases are indistinguishable to the caller.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let found = User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await?;

    let Some(found) = found else {
        return Err(Error::InvalidCredentials);
    };

    if bcrypt::verify(password, &found.password_hash)? {
        Ok(found)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Resets a tenant's password after verifying the current one.
///
/// # Errors
/// Returns an error if:
/// - The new password is too short, or identical to the current one
/// - The email is unknown or the current password is wrong (both reported
///   as [`Error::InvalidCredentials`])
pub async fn reset_password(
    db: &DatabaseConnection,
    email: &str,
    current_password: &str,
    new_password: &str,
) -> Result<()> {
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(Error::InvalidRequest {
            message: format!(
                "New password must be at least {MIN_PASSWORD_LEN} characters long"
            ),
        });
    }
    if current_password == new_password {
        return Err(Error::InvalidRequest {
            message: "New password must be different from current password".to_string(),
        });
    }

    let verified = authenticate(db, email, current_password).await?;

    let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;
    let mut active: user::ActiveModel = verified.into();
    active.password_hash = Set(password_hash);
    active.update(db).await?;

    Ok(())
}

/// Opens a new session for a user and returns it, token included.
pub async fn create_session(
    db: &DatabaseConnection,
    user_id: i64,
    ttl: Duration,
) -> Result<session::Model> {
    let ttl = chrono::Duration::from_std(ttl).map_err(|e| Error::Config {
        message: format!("Session TTL out of range: {e}"),
    })?;
    let now = chrono::Utc::now().naive_utc();

    let new_session = session::ActiveModel {
        token: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + ttl),
    };
    new_session.insert(db).await.map_err(Into::into)
}

/// Resolves a bearer token to its tenant, or `None` for unknown/expired
/// tokens. This is the `currentTenant()` check every protected endpoint
/// runs before touching storage.
pub async fn resolve_session(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<user::Model>> {
    let Some(found) = Session::find_by_id(token.to_string()).one(db).await? else {
        return Ok(None);
    };

    if found.expires_at <= chrono::Utc::now().naive_utc() {
        return Ok(None);
    }

    User::find_by_id(found.user_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Revokes a session token. Revoking an unknown token is a no-op.
pub async fn revoke_session(db: &DatabaseConnection, token: &str) -> Result<()> {
    Session::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_user(&db, "   ".to_string(), "password123").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidRequest { message: _ }
        ));

        let result = create_user(&db, "a@b.test".to_string(), "short").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidRequest { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        create_user(&db, "a@b.test".to_string(), "password123").await?;
        let result = create_user(&db, "a@b.test".to_string(), "password456").await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_roundtrip() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_user(&db, "a@b.test".to_string(), "password123").await?;

        let authed = authenticate(&db, "a@b.test", "password123").await?;
        assert_eq!(authed.id, created.id);

        let wrong = authenticate(&db, "a@b.test", "nope-nope").await;
        assert!(matches!(wrong.unwrap_err(), Error::InvalidCredentials));

        let unknown = authenticate(&db, "who@b.test", "password123").await;
        assert!(matches!(unknown.unwrap_err(), Error::InvalidCredentials));

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_password_rules() -> Result<()> {
        let db = setup_test_db().await?;
        create_user(&db, "a@b.test".to_string(), "password123").await?;

        // Too short
        let result = reset_password(&db, "a@b.test", "password123", "tiny").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidRequest { message: _ }
        ));

        // Same as current
        let result = reset_password(&db, "a@b.test", "password123", "password123").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidRequest { message: _ }
        ));

        // Wrong current password
        let result = reset_password(&db, "a@b.test", "wrong-pass", "newpassword1").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidCredentials));

        // Success, and the new password takes effect
        reset_password(&db, "a@b.test", "password123", "newpassword1").await?;
        authenticate(&db, "a@b.test", "newpassword1").await?;
        let old = authenticate(&db, "a@b.test", "password123").await;
        assert!(matches!(old.unwrap_err(), Error::InvalidCredentials));

        Ok(())
    }

    #[tokio::test]
    async fn test_session_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_user(&db, "a@b.test".to_string(), "password123").await?;

        let session = create_session(&db, created.id, Duration::from_secs(3600)).await?;
        let resolved = resolve_session(&db, &session.token).await?;
        assert_eq!(resolved.unwrap().id, created.id);

        revoke_session(&db, &session.token).await?;
        let gone = resolve_session(&db, &session.token).await?;
        assert!(gone.is_none());

        // Revoking again is a no-op
        revoke_session(&db, &session.token).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_session_resolves_to_no_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_user(&db, "a@b.test".to_string(), "password123").await?;

        let session = create_session(&db, created.id, Duration::ZERO).await?;
        let resolved = resolve_session(&db, &session.token).await?;
        assert!(resolved.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_no_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        let resolved = resolve_session(&db, "no-such-token").await?;
        assert!(resolved.is_none());
        Ok(())
    }
}

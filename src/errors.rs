//! Unified error types and result handling for `stocklens`.
//!
//! One `Error` enum covers the whole service. The web layer maps these
//! variants onto HTTP statuses in `crate::web::error`; core modules only
//! ever construct or propagate them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Any SeaORM/database failure, including constraint violations.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// The caller could not be resolved to a tenant.
    #[error("Unauthorized")]
    Unauthorized,

    /// Login or password-reset credentials did not match.
    #[error("Invalid email or current password")]
    InvalidCredentials,

    /// Request-level input problem (missing field, bad payload).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The upload contained no file part.
    #[error("No file uploaded")]
    MissingFile,

    /// Parsing finished but produced zero valid product rows.
    #[error("No valid products found in file")]
    NoValidRows,

    /// The uploaded container itself could not be read (bad workbook, etc.).
    #[error("Unreadable upload: {message}")]
    UnreadableUpload { message: String },

    /// Product does not exist for this tenant.
    #[error("Product not found: {id}")]
    ProductNotFound { id: String },

    /// The ingestion transaction exceeded its execution budget.
    #[error("Ingestion timed out after {seconds}s; catalog left unchanged")]
    IngestTimeout { seconds: u64 },

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// The insights collaborator rejected our credentials.
    #[error("Invalid insights API key. Please check your configuration.")]
    InsightsAuth,

    /// The insights collaborator is rate limiting us.
    #[error("API rate limit exceeded. Please try again later.")]
    InsightsRateLimited,

    /// Any other insights collaborator failure (network, 5xx, bad payload).
    #[error("Failed to generate insights: {message}")]
    InsightsUnavailable { message: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

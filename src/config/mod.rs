/// Bootstrap tenant seeding from environment variables
pub mod accounts;

/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

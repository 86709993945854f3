/// Database connection, schema creation and store seeding
pub mod database;

/// Secrets read from environment variables
pub mod secrets;

/// Application settings loaded from config.toml
pub mod settings;

use std::env;

/// Database configuration.
///
/// Reads from the `TICKLIST_DATABASE_URL` environment variable, falling back
/// to a `ticklist.db` file in the working directory when unset.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full SQLite connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The default connection URL used when no environment variable is set.
    ///
    /// `mode=rwc` lets SQLite create the file on first open.
    pub const DEFAULT_URL: &str = "sqlite://ticklist.db?mode=rwc";

    /// Build a config from the environment.
    ///
    /// Priority: `TICKLIST_DATABASE_URL` env var, then the compile-time
    /// default.
    pub fn from_env() -> Self {
        let database_url =
            env::var("TICKLIST_DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    /// Build a config from an explicit URL (useful for tests and CLI flags).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

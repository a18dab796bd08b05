//! Service configuration loaded from the environment.

use brewlog_core::resolution::{Sentinels, UNKNOWN};
use brewlog_db::{env_or, ConfigError, DbConfig};

/// Default minimum review count for the top-rated listing.
pub const DEFAULT_TOP_RATED_MIN_REVIEWS: i64 = 5;
/// Default length of the top-rated listing.
pub const DEFAULT_TOP_RATED_LIMIT: i64 = 5;

/// How the staff metrics page picks its top-rated beers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopRatedConfig {
    /// Beers need at least this many reviews to qualify.
    pub min_reviews: i64,
    pub limit: i64,
}

impl Default for TopRatedConfig {
    fn default() -> Self {
        Self {
            min_reviews: DEFAULT_TOP_RATED_MIN_REVIEWS,
            limit: DEFAULT_TOP_RATED_LIMIT,
        }
    }
}

/// Everything [`crate::Brewlog::connect`] needs.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db: DbConfig,
    /// Apply pending migrations on connect (default: `true`).
    pub run_migrations: bool,
    /// Placeholders for beers created from free text.
    pub sentinels: Sentinels,
    pub top_rated: TopRatedConfig,
}

impl ServiceConfig {
    pub fn new(db: DbConfig) -> Self {
        Self {
            db,
            run_migrations: true,
            sentinels: Sentinels::default(),
            top_rated: TopRatedConfig::default(),
        }
    }

    /// Load configuration from `.env` and environment variables.
    ///
    /// | Env Var                 | Default   |
    /// |-------------------------|-----------|
    /// | `RUN_MIGRATIONS`        | `true`    |
    /// | `UNKNOWN_BREWERY_NAME`  | `Unknown` |
    /// | `UNKNOWN_STYLE`         | `Unknown` |
    /// | `TOP_RATED_MIN_REVIEWS` | `5`       |
    /// | `TOP_RATED_LIMIT`       | `5`       |
    ///
    /// Database variables are read by [`DbConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db = DbConfig::from_env()?;
        let run_migrations = env_or("RUN_MIGRATIONS", "bool", true)?;

        let sentinels = Sentinels {
            brewery_name: env_non_blank("UNKNOWN_BREWERY_NAME").unwrap_or_else(|| UNKNOWN.into()),
            style: env_non_blank("UNKNOWN_STYLE").unwrap_or_else(|| UNKNOWN.into()),
        };

        let top_rated = TopRatedConfig {
            min_reviews: env_or(
                "TOP_RATED_MIN_REVIEWS",
                "i64",
                DEFAULT_TOP_RATED_MIN_REVIEWS,
            )?,
            limit: env_or("TOP_RATED_LIMIT", "i64", DEFAULT_TOP_RATED_LIMIT)?,
        };

        Ok(Self {
            db,
            run_migrations,
            sentinels,
            top_rated,
        })
    }
}

fn env_non_blank(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let config = ServiceConfig::new(DbConfig::new("postgres://localhost/brewlog"));
        assert!(config.run_migrations);
        assert_eq!(config.sentinels.brewery_name, UNKNOWN);
        assert_eq!(config.sentinels.style, UNKNOWN);
        assert_eq!(config.top_rated, TopRatedConfig { min_reviews: 5, limit: 5 });
        assert_eq!(config.db.max_connections, 20);
    }
}

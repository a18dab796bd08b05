//! In-process entry points for the Brewlog community.
//!
//! The web layer (routing, sessions, templates, upload storage) lives
//! elsewhere and calls into [`Brewlog`]. Each operation validates its input
//! before opening a transaction, so rejected input never writes anything.
//!
//! - [`reviews`] -- review write path and the rating aggregate.
//! - [`resolver`] -- free-text beer resolution.
//! - [`discussion`] -- threads and posts.
//! - [`moderation`] -- reports and moderation actions.
//! - [`catalog`] -- beer search, detail pages and staff catalog management.

use brewlog_core::resolution::Sentinels;
use brewlog_db::DbPool;

pub mod catalog;
pub mod config;
pub mod discussion;
pub mod error;
pub mod moderation;
pub mod resolver;
pub mod reviews;
pub mod telemetry;

pub use config::{ServiceConfig, TopRatedConfig};
pub use error::{ServiceError, ServiceResult};

/// Handle to the community core. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Brewlog {
    pool: DbPool,
    sentinels: Sentinels,
    top_rated: TopRatedConfig,
}

impl Brewlog {
    /// Wrap an existing pool with default settings.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            sentinels: Sentinels::default(),
            top_rated: TopRatedConfig::default(),
        }
    }

    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    pub fn with_top_rated(mut self, top_rated: TopRatedConfig) -> Self {
        self.top_rated = top_rated;
        self
    }

    /// Connect, check the database and apply pending migrations.
    pub async fn connect(config: &ServiceConfig) -> ServiceResult<Self> {
        let pool = brewlog_db::create_pool_with(&config.db).await?;
        tracing::info!(
            max_connections = config.db.max_connections,
            "Database connection pool created"
        );

        brewlog_db::health_check(&pool).await?;
        tracing::info!("Database health check passed");

        if config.run_migrations {
            brewlog_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self::new(pool)
            .with_sentinels(config.sentinels.clone())
            .with_top_rated(config.top_rated))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }
}

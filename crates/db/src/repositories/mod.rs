//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-statement methods accept any [`sqlx::PgExecutor`] (a pool or an
//! open transaction); multi-statement methods take `&mut PgConnection` so
//! the caller decides the transaction boundary.

pub mod beer_repo;
pub mod brewery_repo;
pub mod metrics_repo;
pub mod post_repo;
pub mod report_repo;
pub mod review_photo_repo;
pub mod review_repo;
pub mod thread_repo;

pub use beer_repo::BeerRepo;
pub use brewery_repo::BreweryRepo;
pub use metrics_repo::MetricsRepo;
pub use post_repo::PostRepo;
pub use report_repo::ReportRepo;
pub use review_photo_repo::ReviewPhotoRepo;
pub use review_repo::ReviewRepo;
pub use thread_repo::ThreadRepo;

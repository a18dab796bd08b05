//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and filters where the table needs them

pub mod beer;
pub mod brewery;
pub mod metrics;
pub mod post;
pub mod report;
pub mod review;
pub mod thread;

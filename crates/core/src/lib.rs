//! Pure domain logic for the Brewlog community catalog.
//!
//! Nothing in this crate touches the database or the network. The `db` crate
//! persists what these modules decide, and the `service` crate wires the two
//! together inside request-scoped transactions.

pub mod actor;
pub mod discussion;
pub mod error;
pub mod moderation;
pub mod rating;
pub mod resolution;
pub mod review;
pub mod types;
pub mod validation;

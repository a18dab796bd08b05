//! Primitive aliases shared by every crate in the workspace.

/// Row identifier; every table uses a `BIGSERIAL` key.
pub type DbId = i64;

/// Creation and update instants, stored as `TIMESTAMPTZ` in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

//! Core business logic - framework-agnostic aggregation, fetching and customer operations.

/// Pure year/range aggregation of a snapshot
pub mod aggregate;
/// Studio customer listing and editing
pub mod customer;
/// Korean currency and period labels
pub mod format;
/// Dashboard subtotal groups
pub mod grouping;
/// Month ranges and date parsing
pub mod period;
/// Normalized record types and revenue sources
pub mod records;
/// Dashboard load state
pub mod session;
/// Concurrent snapshot fetch with retry
pub mod snapshot;

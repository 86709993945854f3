/// Back-office login
pub mod auth;
/// Studio tenant listing and edits
pub mod customers;
/// Aggregated dashboard numbers and load status
pub mod dashboard;
/// Generic row queries
pub mod data;
/// Liveness and database checks
pub mod health;
/// Privileged table actions
pub mod supabase;

//! # GymDesk Shared Library
//!
//! Domain logic and persistence for the GymDesk gym-management backend.
//!
//! ## Module Organization
//!
//! - `lifecycle`: membership status classification and renewal arithmetic
//! - `validation`: member and trainer form rules
//! - `models`: records and their PostgreSQL operations
//! - `store`: the owner-partitioned persistence gateway
//! - `roster`: enrollment, renewal, search, and dashboard operations
//! - `auth`: password hashing, JWTs, and Axum auth middleware
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod lifecycle;
pub mod models;
pub mod roster;
pub mod store;
pub mod validation;

/// Current version of the GymDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

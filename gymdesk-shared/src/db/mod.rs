/// Database layer for GymDesk
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded schema migrations
///
/// Record operations live in the `models` module; the storage-agnostic gateway
/// is in `store`.

pub mod migrations;
pub mod pool;

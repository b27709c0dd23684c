/// Database utilities
///
/// This module provides PostgreSQL connection pooling and migration running:
///
/// - `pool`: Connection pool creation and health checks
/// - `migrations`: Embedded sqlx migration runner

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DatabaseConfig};

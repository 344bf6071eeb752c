//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the attendance, analytics and admin
//! repository ports backed by PostgreSQL through `diesel-async` and `bb8`.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Rates and classifications stay in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: every database failure is mapped to the
//!   calling port's error enum.
//!
//! # Example
//!
//! ```ignore
//! use attendance::outbound::persistence::{DbPool, DieselAttendanceRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/attendance")).await?;
//! let repo = DieselAttendanceRepository::new(pool);
//! ```

mod diesel_admin_repository;
mod diesel_analytics_repository;
mod diesel_attendance_repository;
mod diesel_basic_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_analytics_repository::DieselAnalyticsRepository;
pub use diesel_attendance_repository::DieselAttendanceRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

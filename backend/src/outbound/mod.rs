//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **jwt**: HS256 bearer credential codec
//! - **qr**: PNG QR rendering of session tokens
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod jwt;
pub mod persistence;
pub mod qr;

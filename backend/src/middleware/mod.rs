//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently the
//! trace identifier scope.

pub mod trace;

pub use trace::Trace;

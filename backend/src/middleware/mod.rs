//! Request middleware.
//!
//! Purpose: per-request trace correlation and access logging.

pub mod trace;

pub use trace::Trace;

//! Utility modules for identifier and field coercion.
//!
//! # Modules
//!
//! - [`ids`]: Movie identifier coercion and source labels
//! - [`lenient`]: Shape-tolerant extraction from JSON records

pub mod ids;
pub mod lenient;

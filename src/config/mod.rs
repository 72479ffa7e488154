//! Configuration module
//!
//! Recipe parsing plus the constants the rest of the crate reads.

pub mod defaults;
pub mod recipe;

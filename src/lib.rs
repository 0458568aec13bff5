//! Macrotally Library
//!
//! Resolves free-form food descriptions into macronutrient totals.

pub mod build_info;
pub mod config;
pub mod lookup;
pub mod models;
pub mod nutrition;
pub mod report;

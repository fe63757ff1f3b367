//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod configure;
pub mod export;

//! CLI command implementations.

pub mod resolve;
pub mod signing;
pub mod variants;

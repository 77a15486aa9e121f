//! Domain models for build-variant resolution.

pub mod abi;
pub mod project;
pub mod sdk;
pub mod signing;
pub mod variant;

pub use abi::*;
pub use project::*;
pub use sdk::*;
pub use signing::*;
pub use variant::*;

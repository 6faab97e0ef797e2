//! Shared type definitions.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::*;
pub use status::*;

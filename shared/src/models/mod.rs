//! Data models
//!
//! Records exchanged with the REST backend. All IDs are strings and all
//! fields are camelCase on the wire.

pub mod branch;
pub mod combo;
pub mod employee;
pub mod membership;
pub mod product;
pub mod role;
pub mod service;
pub mod transaction;

// Re-exports
pub use branch::*;
pub use combo::*;
pub use employee::*;
pub use membership::*;
pub use product::*;
pub use role::*;
pub use service::*;
pub use transaction::*;

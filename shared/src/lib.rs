//! Shared types for Lotus POS
//!
//! Records, roles and auth DTOs exchanged with the REST backend and
//! persisted by the client session store.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{LoginRequest, LoginResponse, Session, UserInfo};
pub use models::Role;
pub use response::ErrorBody;

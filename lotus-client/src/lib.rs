//! Lotus Client - session, access control and reporting for the spa POS
//!
//! Talks to the REST backend over HTTP, keeps the signed-in session cached on
//! disk, gates pages by role and turns transactions into dashboard figures.

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod logger;
pub mod nav;
pub mod report;
pub mod scope;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::{ApiClient, Resource};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gate::{AccessDecision, check_access, check_path, check_route, post_login_redirect};
pub use http::HttpClient;
pub use nav::{AppRoute, NavItem, home_route, navigation};
pub use session::{AuthBackend, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};

// Re-export shared types for convenience
pub use shared::models::Role;
pub use shared::{LoginRequest, LoginResponse, Session, UserInfo};

#![forbid(unsafe_code)]
//! HTTP surface of the clinic administration panel.
//!
//! All routes live under `/api`. Doctor and profile routes require a session
//! token issued by `POST /api/auth/manager-signin`; patient routes are open.

pub mod config;
pub mod http;

pub use config::{ConfigError, CorsOrigins, ServerConfig};
pub use http::{build_router, ApiError, AppState};

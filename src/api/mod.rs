//! HTTP API for the compliance audit engine.
//!
//! A single authenticated endpoint, `POST /api/audit`, dispatches on an
//! `action` discriminator to run audits, simulations and auditor-pack
//! exports.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use auth::{bearer_token, Claims, ClaimsVerifier, StaticTokenVerifier};
pub use handlers::create_router;
pub use request::{AuditAction, AuditRequest};
pub use response::{ApiError, RunResponse};
pub use state::AppState;

//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and the request gate.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AccountAppState;
pub use middleware::{bearer_token, identify_viewer, require_auth};
pub use router::{account_router, account_router_generic};

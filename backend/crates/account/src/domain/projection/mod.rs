//! Profile Projection
//!
//! Computes what a viewer may see of a user. Two phases:
//! 1. tier gate (`private` / `friends` collapse to a minimal shape)
//! 2. per-field filtering driven by [`rules::VISIBILITY_RULES`]

pub mod projector;
pub mod rules;
pub mod view;

pub use projector::{Viewer, project, self_view};
pub use view::{ListView, ProfileView, RestrictedProfile, SelfView, VisibleProfile};

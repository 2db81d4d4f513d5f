//! Domain Layer
//!
//! Entities, value objects, the profile projection and the store trait.

pub mod entity;
pub mod projection;
pub mod repository;
pub mod value_object;

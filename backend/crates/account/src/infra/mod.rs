//! Infrastructure Layer
//!
//! Account store implementations and the stored document shape.

pub mod document;
pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

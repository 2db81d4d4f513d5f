//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, URL-safe Base64, randomness)
//! - Password hashing (Argon2id, NIST SP 800-63B oriented policy)

pub mod crypto;
pub mod password;

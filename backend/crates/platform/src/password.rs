//! Password Hashing and Verification
//!
//! NIST SP 800-63B oriented password handling with:
//! - Argon2id hashing with an explicit, configurable cost
//! - Zeroization of clear text
//! - Unicode NFKC normalization before validation and hashing
//!
//! The hash cost is a value passed in by the caller; nothing here reads
//! process-wide configuration.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),
}

// ============================================================================
// Hash cost
// ============================================================================

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashCost {
    /// Smallest cost Argon2 accepts. Only suitable for tests.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// - 8 to 128 characters (Unicode code points, after NFKC)
    /// - No control characters other than space, tab and newline
    /// - Not whitespace only
    /// - Not a well-known weak password
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(Self(normalized))
    }

    /// Wrap a password for verification only, skipping the policy.
    ///
    /// Login must not reject a stored password because the policy changed
    /// after it was set, so only normalization is applied.
    pub fn for_verification(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the password using Argon2id with the given cost
    pub fn hash(
        &self,
        pepper: Option<&[u8]>,
        cost: &HashCost,
    ) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = self.peppered(pepper);
        let salt = SaltString::generate(&mut OsRng);

        let result = cost
            .hasher()?
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries the algorithm, version, cost parameters and salt,
/// so verification never needs the cost that was used at hashing time.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from the account store)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash (constant-time inside argon2)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let mut password_bytes = password.peppered(pepper);
        let valid = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();
        password_bytes.zeroize();
        valid
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // e.g. "aaaaaaaa"
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];
    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein1",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "baseball",
        "trustno1",
        "gamer123",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));
    let descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    ascending || descending
}

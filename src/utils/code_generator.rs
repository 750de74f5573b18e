//! Short code generation and validation utilities.
//!
//! Provides the pluggable code-generation capability used by the allocator
//! and validation for custom user-provided codes.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of generated short codes.
const DEFAULT_CODE_LENGTH: usize = 6;

/// Accepted length bounds for custom codes.
const MIN_CODE_LENGTH: usize = 3;
const MAX_CODE_LENGTH: usize = 8;

/// Reserved codes that cannot be used as short links.
///
/// These collide with system routes, so a link under one of them would be
/// unreachable.
const RESERVED_CODES: &[&str] = &["api", "healthz", "health", "static", "favicon"];

/// A source of candidate short codes.
///
/// The allocator in [`crate::application::services::LinkService`] only sees
/// this interface, so the uniform-random generator can be swapped for a
/// sequential or hash-based one without touching the retry/collision logic.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces the next candidate code. Makes no uniqueness guarantee.
    fn next(&self) -> String;
}

/// Generates codes by drawing uniformly from the 62-symbol alphanumeric
/// alphabet.
///
/// At the default length of 6 the code space holds 62^6 ≈ 5.6 × 10^10
/// values, so collisions are rare in steady state.
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator producing codes of the given length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn next(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect()
    }
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-8 characters
/// - Allowed characters: ASCII letters and digits
/// - Cannot be a reserved system code
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any validation rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Code must be 3-8 characters (letters and numbers only)",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Code must contain only letters and numbers",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

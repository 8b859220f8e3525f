//! Local credential checks.
//!
//! Run before any user-creation request so that obviously bad input never
//! reaches the server.

use thiserror::Error;

/// Minimum length, in characters, of usernames and passwords.
pub const MIN_CREDENTIAL_LEN: usize = 10;

/// Credential validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Username shorter than [`MIN_CREDENTIAL_LEN`].
    #[error("The username must be at least {} characters long.", MIN_CREDENTIAL_LEN)]
    UsernameTooShort,

    /// Password shorter than [`MIN_CREDENTIAL_LEN`].
    #[error("The password must be at least {} characters long.", MIN_CREDENTIAL_LEN)]
    PasswordTooShort,
}

/// Check a username/password pair for user creation.
///
/// The username is checked first, so a pair where both are too short reports
/// the username.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

use crate::error::{AppError, Result};

/// Shortest accepted login or password, in characters.
pub const MIN_CREDENTIAL_LEN: usize = 4;
/// Longest accepted login or password, in characters.
pub const MAX_CREDENTIAL_LEN: usize = 31;

fn validate_length(field: &str, value: &str) -> Result<()> {
    let len = value.chars().count();
    if !(MIN_CREDENTIAL_LEN..=MAX_CREDENTIAL_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "{} must be {} to {} characters long",
            field, MIN_CREDENTIAL_LEN, MAX_CREDENTIAL_LEN
        )));
    }
    Ok(())
}

/// Validates a login.
///
/// # Arguments
///
/// * `login` - The login to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the login is valid.
pub fn validate_login(login: &str) -> Result<()> {
    validate_length("Login", login)
}

/// Validates a password.
pub fn validate_password(password: &str) -> Result<()> {
    validate_length("Password", password)
}

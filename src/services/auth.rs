use crate::crypto::password::{hash_password, verify_dummy, verify_password};
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user::UserStore;
use crate::validation::auth::{validate_login, validate_password};

/// Creates a new user.
///
/// Validates both fields, hashes the password and stores the user. Nothing
/// is written when validation fails.
///
/// # Arguments
///
/// * `users` - The user store.
/// * `login` - The requested login.
/// * `password` - The plaintext password.
///
/// # Returns
///
/// A `Result` containing the created `User`, `AppError::Validation` or
/// `AppError::DuplicateLogin`.
pub async fn register_user(users: &dyn UserStore, login: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", login);
    validate_login(login)?;
    validate_password(password)?;

    let password_hash = hash_password(password)?;
    let user = users.create(login, &password_hash).await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user.
///
/// An unknown login and a wrong password are indistinguishable to the caller,
/// both in outcome and in Argon2 work done.
///
/// # Arguments
///
/// * `users` - The user store.
/// * `login` - The submitted login.
/// * `password` - The submitted password.
///
/// # Returns
///
/// A `Result` containing the authenticated `User` or `AppError::InvalidCredentials`.
pub async fn authenticate_user(users: &dyn UserStore, login: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", login);

    let Some(user) = users.find_by_login(login).await? else {
        verify_dummy(password);
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user::MemoryUserStore;

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let users = MemoryUserStore::new();

        let user = register_user(&users, "alice01", "s3cret!").await.unwrap();

        assert_eq!(user.login, "alice01");
        assert_ne!(user.password_hash, "s3cret!");
        assert!(verify_password("s3cret!", &user.password_hash));
    }

    #[tokio::test]
    async fn register_rejects_invalid_fields_without_writing() {
        let users = MemoryUserStore::new();

        for (login, password) in [("abc", "s3cret!"), ("alice01", "abc"), ("", ""), (&*"a".repeat(32), "s3cret!")] {
            let err = register_user(&users, login, password).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        assert!(users.is_empty().await);
    }

    #[tokio::test]
    async fn register_twice_is_duplicate() {
        let users = MemoryUserStore::new();
        register_user(&users, "alice01", "s3cret!").await.unwrap();

        let err = register_user(&users, "alice01", "other-pass").await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateLogin(_)));
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let users = MemoryUserStore::new();
        let created = register_user(&users, "alice01", "s3cret!").await.unwrap();

        let user = authenticate_user(&users, "alice01", "s3cret!").await.unwrap();
        assert_eq!(user.id, created.id);

        let err = authenticate_user(&users, "alice01", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_login_is_invalid_credentials() {
        let users = MemoryUserStore::new();

        let err = authenticate_user(&users, "nobody", "s3cret!").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_login_costs_a_full_verification() {
        let users = MemoryUserStore::new();
        register_user(&users, "alice01", "s3cret!").await.unwrap();
        // First call also builds the fixed hash.
        let _ = authenticate_user(&users, "nobody", "s3cret!").await;

        let started = std::time::Instant::now();
        let _ = authenticate_user(&users, "alice01", "wrong").await;
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        let _ = authenticate_user(&users, "nobody", "wrong").await;
        let unknown_login = started.elapsed();

        assert!(
            unknown_login * 4 >= wrong_password,
            "unknown login took {:?}, wrong password took {:?}",
            unknown_login,
            wrong_password
        );
    }
}

use chrono::{DateTime, Utc};

/// Represents a registered user.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The user's login name, unique across all users.
    pub login: String,
    /// The user's Argon2 password hash. Never the plaintext.
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

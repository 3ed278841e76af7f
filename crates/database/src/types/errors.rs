//! Error types for the durable store layer.

use thiserror::Error;

/// User-related errors
#[derive(Debug, Error, Clone)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already taken")]
    EmailTaken,

    #[error("Invalid user data: {0}")]
    InvalidUserData(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed")]
    PasswordHashingFailed,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Notification-preference errors
#[derive(Debug, Error, Clone)]
pub enum PreferenceError {
    #[error("Preference not found")]
    NotFound,

    #[error("Preference already exists")]
    Conflict,

    #[error("Invalid preference data: {0}")]
    InvalidPreferenceData(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Result types for store operations
pub type UserResult<T> = Result<T, UserError>;
pub type PreferenceResult<T> = Result<T, PreferenceError>;

/// Convert database errors to our error types
impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserError::UserNotFound,
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.contains("UNIQUE constraint failed") {
                    if message.contains("email") {
                        UserError::EmailTaken
                    } else {
                        UserError::UsernameTaken
                    }
                } else {
                    UserError::DatabaseError(message.to_string())
                }
            }
            _ => UserError::DatabaseError(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for PreferenceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => PreferenceError::NotFound,
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.contains("UNIQUE constraint failed") {
                    PreferenceError::Conflict
                } else {
                    PreferenceError::DatabaseError(message.to_string())
                }
            }
            _ => PreferenceError::DatabaseError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(UserError::UserNotFound.to_string(), "User not found");
        assert_eq!(
            PreferenceError::Conflict.to_string(),
            "Preference already exists"
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let user_err: UserError = sqlx::Error::RowNotFound.into();
        assert!(matches!(user_err, UserError::UserNotFound));

        let pref_err: PreferenceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(pref_err, PreferenceError::NotFound));
    }
}

//! Domain entities stored in the relational database

pub mod preference;
pub mod user;

pub use preference::{CreatePreferenceRequest, NotificationPreference, UpdatePreferenceRequest};
pub use user::{CreateUserRequest, NewUser, UpdateUserRequest, User};

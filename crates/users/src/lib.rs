//! # Courier Users Crate
//!
//! Domain services for user accounts and notification preferences. The
//! interesting piece is [`PreferenceService`], the coordinator that keeps the
//! preference cache coherent with the durable store: reads go through the
//! cache, writes go to the store and then delete the cached snapshot before
//! the caller sees success.

pub mod services;

// Re-export database types and repositories
pub use courier_database::{
    CreatePreferenceRequest, CreateUserRequest, NewUser, NotificationPreference,
    PreferenceError, PreferenceRepository, PreferenceResult, UpdatePreferenceRequest,
    UpdateUserRequest, User, UserError, UserRepository, UserResult,
};

pub use services::{
    preference_service::{PreferenceRepo, PreferenceService},
    user_service::{UserRepo, UserService},
};

//! Business logic layer for users and notification preferences

pub mod mock_repositories;
pub mod preference_service;
pub mod user_service;

pub use preference_service::PreferenceService;
pub use user_service::UserService;

//! Repository implementations for database access

pub mod preference_repository;
pub mod user_repository;

pub use preference_repository::PreferenceRepository;
pub use user_repository::UserRepository;

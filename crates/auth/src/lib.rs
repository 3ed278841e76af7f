//! # Courier Auth Crate
//!
//! Authentication and authorization primitives for the Courier backend:
//! stateless JWT issue/verify, argon2 password hashing, and the ownership
//! guard applied to every protected request.

pub mod guard;
pub mod password;
pub mod token;

pub use guard::{authorize, AuthzError, Caller};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

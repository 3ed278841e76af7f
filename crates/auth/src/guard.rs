//! Authorization guard: who may touch which user's resources.

use thiserror::Error;

/// How the caller was classified at the transport boundary.
///
/// `Internal` is a pre-authenticated capability: it is only ever constructed
/// for the service-to-service route family, which the deployment keeps off
/// the public network. The guard does not second-guess that classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// An end user whose token verified to this user id.
    User(i64),
    /// A trusted service-to-service caller.
    Internal,
}

impl Caller {
    /// The user id behind the caller, if it is an end user
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Caller::User(id) => Some(*id),
            Caller::Internal => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Not enough permissions")]
    Forbidden,
}

/// Decide whether the caller may act on resources owned by `target_user_id`.
///
/// End users may only touch their own resources; there is no admin override.
pub fn authorize(caller: &Caller, target_user_id: i64) -> Result<(), AuthzError> {
    match caller {
        Caller::Internal => Ok(()),
        Caller::User(id) if *id == target_user_id => Ok(()),
        Caller::User(_) => Err(AuthzError::Forbidden),
    }
}

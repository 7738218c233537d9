//! The service provider interface (SPI) for authentication.

use super::Authorization;
use async_trait::async_trait;
use std::fmt;

/// Defines the requirements for authenticator implementations.
///
/// `AuthFailed` is returned uniformly whether the username is unknown or the password is wrong,
/// so the client (and, by construction, every call site) cannot distinguish the two cases — this
/// is what lets auth throttling apply evenly to both, per the session engine's design notes.
#[async_trait]
pub trait Authenticator: Sync + Send + fmt::Debug {
    /// Verifies `(username, password)`, returning the granted [`Authorization`] on success.
    async fn authorize(&self, username: &str, password: &str) -> Result<Authorization, AuthFailed>;
}

/// Authentication failed. Carries no information about *why* — the client sees the same 530
/// whether the user doesn't exist or the password was wrong.
#[derive(Debug, Clone, Copy)]
pub struct AuthFailed;

impl fmt::Display for AuthFailed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "authentication failed")
    }
}

impl std::error::Error for AuthFailed {}

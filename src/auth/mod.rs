#![deny(missing_docs)]

//! Verifies `(user, password)` pairs and hands back the [`Vfs`](crate::vfs::Vfs) view a session
//! should see.
//!
//! Built-in implementations: [`NullAuthenticator`] (always fails), [`anonymous::AnonymousAuthenticator`]
//! (accepts `anonymous`/`ftp` with any password), and [`userlist::UserListAuthenticator`] (salted
//! password hashes, binary search by username). Credential storage formats beyond an in-memory
//! sorted list are out of scope for this crate.

pub mod anonymous;
pub mod authenticator;
pub mod userlist;

pub use anonymous::AnonymousAuthenticator;
pub use authenticator::{AuthFailed, Authenticator};
pub use userlist::UserListAuthenticator;

use crate::vfs::Vfs;
use std::fmt;
use std::sync::Arc;

/// The outcome of a successful [`Authenticator::authorize`] call.
#[derive(Clone)]
pub struct Authorization {
    /// The display name the session will use in LIST output and SYST-adjacent replies.
    pub user: String,
    /// The VFS view granted to this user.
    pub vfs: Arc<dyn Vfs>,
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization").field("user", &self.user).finish()
    }
}

/// Always refuses authentication. The default when no authenticator is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuthenticator;

#[async_trait::async_trait]
impl Authenticator for NullAuthenticator {
    async fn authorize(&self, _username: &str, _password: &str) -> Result<Authorization, AuthFailed> {
        Err(AuthFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_authenticator_always_fails() {
        assert!(NullAuthenticator.authorize("anyone", "anything").await.is_err());
    }
}

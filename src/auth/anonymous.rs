//! Accepts `anonymous` or `ftp` with any password and returns a read-only view over the
//! server's default VFS.

use super::{AuthFailed, Authenticator, Authorization};
use crate::vfs::{Vfs, readonly::ReadOnlyVfs};
use async_trait::async_trait;
use std::sync::Arc;

/// See module docs.
#[derive(Debug, Clone)]
pub struct AnonymousAuthenticator {
    default_vfs: Arc<dyn Vfs>,
}

impl AnonymousAuthenticator {
    /// Anonymous logins will see a read-only view over `default_vfs`.
    pub fn new(default_vfs: Arc<dyn Vfs>) -> Self {
        AnonymousAuthenticator { default_vfs }
    }
}

#[async_trait]
impl Authenticator for AnonymousAuthenticator {
    #[tracing_attributes::instrument]
    async fn authorize(&self, username: &str, _password: &str) -> Result<Authorization, AuthFailed> {
        if username == "anonymous" || username == "ftp" {
            Ok(Authorization {
                user: username.to_string(),
                vfs: Arc::new(ReadOnlyVfs::new(self.default_vfs.clone())),
            })
        } else {
            Err(AuthFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::null::NullVfs;

    #[tokio::test]
    async fn accepts_anonymous_and_ftp() {
        let auth = AnonymousAuthenticator::new(Arc::new(NullVfs));
        assert!(auth.authorize("anonymous", "x@y").await.is_ok());
        assert!(auth.authorize("ftp", "").await.is_ok());
        assert!(auth.authorize("someoneelse", "x").await.is_err());
    }
}

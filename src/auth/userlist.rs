//! A built-in authenticator backed by an in-memory, name-sorted list of users with salted
//! password hashes. Storage/loading of that list from disk is out of scope for this crate.

use super::{AuthFailed, Authenticator, Authorization};
use crate::vfs::Vfs;
use async_trait::async_trait;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;

const PBKDF2_ROUNDS: u32 = 100_000;
const KEY_LEN: usize = 32;

/// One entry in a [`UserListAuthenticator`]'s table. Entries must be sorted by `username` for
/// the binary search in [`UserListAuthenticator::authorize`] to work.
#[derive(Clone)]
pub struct UserListEntry {
    /// Case-sensitive login name.
    pub username: String,
    /// Base64-encoded PBKDF2-HMAC-SHA256 salt.
    pub salt: String,
    /// Base64-encoded PBKDF2-HMAC-SHA256 derived key.
    pub hash: String,
    /// VFS view granted to this user on success.
    pub vfs: Arc<dyn Vfs>,
}

impl fmt::Debug for UserListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserListEntry").field("username", &self.username).finish()
    }
}

/// Hashes `password` with a freshly generated random salt, suitable for populating
/// [`UserListEntry::salt`]/[`UserListEntry::hash`] when provisioning a user.
pub fn hash_password(password: &str) -> (String, String) {
    let mut salt = [0u8; 16];
    getrandom::fill(&mut salt).expect("failed to generate random salt");
    let hash = derive_key(password, &salt);
    (
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, salt),
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, hash),
    )
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ROUNDS, &mut out).expect("HMAC can be initialized with any key length");
    out
}

/// See module docs. Performs a case-sensitive binary search over a name-sorted table.
#[derive(Debug, Clone)]
pub struct UserListAuthenticator {
    users: Vec<UserListEntry>,
}

impl UserListAuthenticator {
    /// Builds an authenticator from an already name-sorted `users` table. Panics in debug builds
    /// if the table is not sorted, since the binary search below silently misbehaves otherwise.
    pub fn new(users: Vec<UserListEntry>) -> Self {
        debug_assert!(users.windows(2).all(|w| w[0].username < w[1].username), "UserListAuthenticator requires a name-sorted table");
        UserListAuthenticator { users }
    }
}

#[async_trait]
impl Authenticator for UserListAuthenticator {
    async fn authorize(&self, username: &str, password: &str) -> Result<Authorization, AuthFailed> {
        let entry = self.users.binary_search_by(|e| e.username.as_str().cmp(username)).ok().map(|idx| &self.users[idx]).ok_or(AuthFailed)?;

        let salt = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &entry.salt).map_err(|_| AuthFailed)?;
        let expected = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &entry.hash).map_err(|_| AuthFailed)?;
        let actual = derive_key(password, &salt);

        if constant_time_eq(&actual, &expected) {
            Ok(Authorization {
                user: entry.username.clone(),
                vfs: entry.vfs.clone(),
            })
        } else {
            Err(AuthFailed)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::null::NullVfs;

    fn entry(username: &str, password: &str) -> UserListEntry {
        let (salt, hash) = hash_password(password);
        UserListEntry {
            username: username.to_string(),
            salt,
            hash,
            vfs: Arc::new(NullVfs),
        }
    }

    #[tokio::test]
    async fn authorizes_known_user_with_correct_password() {
        let auth = UserListAuthenticator::new(vec![entry("alice", "s3cret"), entry("bob", "hunter2")]);
        assert!(auth.authorize("bob", "hunter2").await.is_ok());
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_user_identically() {
        let auth = UserListAuthenticator::new(vec![entry("alice", "s3cret")]);
        assert!(auth.authorize("alice", "wrong").await.is_err());
        assert!(auth.authorize("carol", "whatever").await.is_err());
    }
}

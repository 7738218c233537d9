//! Per-connection state: the authenticated principal (if any), present working directory, TLS/
//! protection flags, rename staging, and the current data channel.

use super::datachan::DataTransfer;
use super::portpool::PortPool;
use super::shutdown;
use super::tls::FtpsConfig;
use crate::auth::Authenticator;
use crate::vfs::{Ctx, ReadStream, Vfs};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;

/// Configuration shared by every command handler invocation on a session; built once per
/// listener and handed to each accepted connection.
#[derive(Clone)]
pub struct SessionConfig {
    pub greeting: String,
    pub authenticator: Arc<dyn Authenticator>,
    pub port_pool: Arc<PortPool>,
    pub ftps: Option<FtpsConfig>,
    pub ftps_required: bool,
    pub passive_host: IpAddr,
    pub enable_active_mode: bool,
    pub enable_address_check: bool,
    pub logger: slog::Logger,
}

/// Per-connection mutable state. Only ever touched by that connection's control task, except for
/// `data_transfer`/`transfer_ctx`, which a spawned data-transfer task also holds a clone of.
pub struct Session {
    /// Short hex id used to correlate log lines for this connection.
    pub id: String,
    pub peer_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub pwd: String,
    pub user: Option<String>,
    pub vfs: Option<Arc<dyn Vfs>>,
    pub control_tls: bool,
    pub pbsz_seen: bool,
    pub protect_data: bool,
    pub rename_from: Option<String>,
    pub rename_source: Option<ReadStream>,
    pub data_transfer: Arc<AsyncMutex<DataTransfer>>,
    pub transfer_ctx: Arc<std::sync::Mutex<Option<Ctx>>>,
    pub epsv_all: bool,
    pub auth_failures: u32,
    pub quit: bool,
    /// Set by `AUTH TLS` after replying `234`; the control loop performs the actual handshake
    /// and then clears this flag.
    pub request_tls_upgrade: bool,
    pub shutdown_listener: shutdown::Listener,
    executing: Arc<AtomicBool>,
    pub ctx: Ctx,
}

impl Session {
    pub fn new(id: String, peer_addr: SocketAddr, local_addr: SocketAddr, shutdown_listener: shutdown::Listener) -> Self {
        Session {
            id,
            peer_addr,
            local_addr,
            pwd: "/".to_string(),
            user: None,
            vfs: None,
            control_tls: false,
            pbsz_seen: false,
            protect_data: false,
            rename_from: None,
            rename_source: None,
            data_transfer: Arc::new(AsyncMutex::new(DataTransfer::None)),
            transfer_ctx: Arc::new(std::sync::Mutex::new(None)),
            epsv_all: false,
            auth_failures: 0,
            quit: false,
            request_tls_upgrade: false,
            shutdown_listener,
            executing: Arc::new(AtomicBool::new(false)),
            ctx: Ctx::background(),
        }
    }

    /// Resolves `arg` (absolute or relative) against `pwd` into a cleaned absolute path.
    pub fn resolve(&self, arg: &str) -> String {
        let combined = if arg.starts_with('/') {
            arg.to_string()
        } else {
            format!("{}/{}", self.pwd.trim_end_matches('/'), arg)
        };
        normalize(&combined)
    }

    /// The VFS view for the authenticated principal, or `None` before `PASS` succeeds.
    pub fn vfs(&self) -> Option<Arc<dyn Vfs>> {
        self.vfs.clone()
    }

    /// Seconds to sleep before replying to a failed `PASS`, per the exponential-backoff policy:
    /// `2 * 2^(failures-1)`, capped at 8s. Called *after* incrementing `auth_failures`.
    pub fn auth_throttle_delay(&self) -> Duration {
        let exp = self.auth_failures.saturating_sub(1).min(2);
        Duration::from_secs(2u64.saturating_mul(1 << exp).min(8))
    }

    /// Marks the session as currently running a command (used by graceful shutdown to know
    /// whether it's safe to close the socket immediately).
    pub fn mark_executing(&self, executing: bool) {
        self.executing.store(executing, Ordering::SeqCst);
    }

    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    /// A clone of the "is this session executing a command" flag, for sharing with a spawned
    /// data-transfer task without giving it the whole `Session`.
    pub fn executing_flag(&self) -> Arc<AtomicBool> {
        self.executing.clone()
    }
}

/// Collapses `.`/`..`/empty segments into a cleaned absolute path (root is `"/"`).
pub fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            p => stack.push(p),
        }
    }
    if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Doubles embedded `"` per RFC 959's quoting convention for 257/DirCreated-style replies.
pub fn quote_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dotdot_and_root() {
        assert_eq!(normalize("/foo/bar/../baz"), "/foo/baz");
        assert_eq!(normalize("/foo/.."), "/");
        assert_eq!(normalize("/.."), "/");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn quote_path_doubles_embedded_quotes() {
        assert_eq!(quote_path("/foo/bar\" hoge"), "\"/foo/bar\"\" hoge\"");
    }

    #[tokio::test]
    async fn auth_throttle_delay_doubles_and_caps() {
        let notifier = shutdown::Notifier::new();
        let mut s = Session::new("x".into(), "127.0.0.1:1".parse().unwrap(), "127.0.0.1:2".parse().unwrap(), notifier.subscribe().await);
        s.auth_failures = 1;
        assert_eq!(s.auth_throttle_delay(), Duration::from_secs(2));
        s.auth_failures = 2;
        assert_eq!(s.auth_throttle_delay(), Duration::from_secs(4));
        s.auth_failures = 3;
        assert_eq!(s.auth_throttle_delay(), Duration::from_secs(8));
        s.auth_failures = 10;
        assert_eq!(s.auth_throttle_delay(), Duration::from_secs(8));
    }
}

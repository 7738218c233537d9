//! The virtual filesystem abstraction that lets an object-store backend impersonate a
//! hierarchical filesystem for FTP clients.

pub mod null;
pub mod objectstore;
pub mod readonly;

use async_trait::async_trait;
use derive_more::Display;
use std::fmt;
use std::time::SystemTime;
use thiserror::Error;
use tokio::io::AsyncRead;

/// A boxed, send-able byte stream used both for reads returned by [`Vfs::open`] and bodies
/// accepted by [`Vfs::create`].
pub type ReadStream = std::pin::Pin<Box<dyn AsyncRead + Send + Sync>>;

bitflags::bitflags! {
    /// Unix-style permission bits reported in [`FileInfo::mode`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mode: u32 {
        /// Owner/group/other read bits (`0444`).
        const READ = 0o444;
        /// Owner/group/other write bits (`0222`).
        const WRITE = 0o222;
        /// Owner/group/other execute/traverse bits (`0111`).
        const EXEC = 0o111;
        /// Marks the entry as a directory.
        const DIR = 0o1_000_000;
    }
}

impl Mode {
    /// The mode synthesized for object-store directories: `0755|dir`.
    pub fn synthesized_dir() -> Self {
        Mode::from_bits_truncate(0o755) | Mode::DIR
    }

    /// Renders the ten-character `drwxrwxrwx`-style string used in LIST output.
    pub fn to_ls_string(self) -> String {
        let d = if self.contains(Mode::DIR) { 'd' } else { '-' };
        let bit = |set: bool, c: char| if set { c } else { '-' };
        format!(
            "{}{}{}{}{}{}{}{}{}{}",
            d,
            bit(self.contains(Mode::READ), 'r'),
            bit(self.contains(Mode::WRITE), 'w'),
            bit(self.contains(Mode::EXEC), 'x'),
            bit(self.contains(Mode::READ), 'r'),
            bit(self.contains(Mode::WRITE), 'w'),
            bit(self.contains(Mode::EXEC), 'x'),
            bit(self.contains(Mode::READ), 'r'),
            bit(self.contains(Mode::WRITE), 'w'),
            bit(self.contains(Mode::EXEC), 'x'),
        )
    }
}

/// Metadata about a single filesystem entry, as reported by `stat`/`lstat`/`readDir`.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// The entry's base name (not a full path).
    pub name: String,
    /// Size in bytes; meaningless (but present) for directories.
    pub size: u64,
    /// Last-modified time. `None` for synthesized directories (time-zero).
    pub mod_time: Option<SystemTime>,
    /// Permission bits plus the directory flag.
    pub mode: Mode,
}

impl FileInfo {
    /// True when this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.mode.contains(Mode::DIR)
    }
}

/// The error taxonomy shared by every VFS implementation, mapped to FTP reply codes at the
/// session boundary. Never leaks backend-specific detail strings to the client; the `source`
/// is for server-side logging only.
#[derive(Debug, Error)]
#[error("vfs error: {kind}")]
pub struct VfsError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl VfsError {
    /// Builds an error of the given kind carrying an underlying cause for logging.
    pub fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        VfsError {
            kind,
            source: Some(source.into()),
        }
    }

    /// The classification used to pick an FTP reply code.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for VfsError {
    fn from(kind: ErrorKind) -> Self {
        VfsError { kind, source: None }
    }
}

/// Internal error classification, independent of any particular backend.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// 550 Path absent.
    #[display("550 path does not exist")]
    NotExist,
    /// 553/550 Path conflict on create/mkdir.
    #[display("550 path already exists")]
    Exists,
    /// 550 Access denied.
    #[display("550 permission denied")]
    Permission,
    /// A non-empty directory was targeted by `remove`.
    #[display("550 directory not empty")]
    DirectoryNotEmpty,
    /// 451/500 Backend/transport error not otherwise classified.
    #[display("451 internal error")]
    Internal,
}

impl From<std::io::Error> for VfsError {
    fn from(e: std::io::Error) -> Self {
        let kind = classify_io_error(&e);
        VfsError::new(kind, e)
    }
}

fn classify_io_error(e: &std::io::Error) -> ErrorKind {
    use std::io::ErrorKind as IoKind;
    match e.kind() {
        IoKind::NotFound => return ErrorKind::NotExist,
        IoKind::AlreadyExists => return ErrorKind::Exists,
        IoKind::PermissionDenied => return ErrorKind::Permission,
        _ => {}
    }
    #[cfg(unix)]
    {
        if let Some(errno) = e.raw_os_error() {
            return match errno {
                libc::ENOTEMPTY => ErrorKind::DirectoryNotEmpty,
                libc::ENOTDIR | libc::EISDIR => ErrorKind::Permission,
                libc::ENOSPC | libc::EROFS => ErrorKind::Internal,
                _ => ErrorKind::Internal,
            };
        }
    }
    ErrorKind::Internal
}

/// A hierarchical view over storage, implemented either directly (e.g. [`objectstore::ObjectStoreFs`])
/// or as an adapter over another `Vfs` (e.g. [`readonly::ReadOnlyVfs`]).
///
/// All operations take a cancellation-bearing `ctx` so that callers can enforce the per-command
/// timeout described by the session engine.
#[async_trait]
pub trait Vfs: Send + Sync + fmt::Debug {
    /// Opens `path` for reading.
    async fn open(&self, ctx: &Ctx, path: &str) -> Result<ReadStream, VfsError>;

    /// Returns metadata for `path`, following no symlinks (there are none in this model, so
    /// `stat` and `lstat` coincide).
    async fn stat(&self, ctx: &Ctx, path: &str) -> Result<FileInfo, VfsError>;

    /// Equivalent to [`Vfs::stat`]; kept as a distinct method because some backends (a real
    /// symlink-aware local filesystem) would need to differentiate the two.
    async fn lstat(&self, ctx: &Ctx, path: &str) -> Result<FileInfo, VfsError> {
        self.stat(ctx, path).await
    }

    /// Lists the immediate children of the directory at `path`, excluding `.`/`..`, in stable
    /// byte-ascending order of name. The root always succeeds, even when empty.
    async fn read_dir(&self, ctx: &Ctx, path: &str) -> Result<Vec<FileInfo>, VfsError>;

    /// Creates or overwrites the file at `path`, consuming `body` to EOF.
    async fn create(&self, ctx: &Ctx, path: &str, body: ReadStream) -> Result<(), VfsError>;

    /// Creates a directory at `path`.
    async fn mkdir(&self, ctx: &Ctx, path: &str) -> Result<(), VfsError>;

    /// Removes the file or (empty) directory at `path`.
    async fn remove(&self, ctx: &Ctx, path: &str) -> Result<(), VfsError>;
}

/// A cancellation-bearing context threaded through VFS calls. Presently a thin wrapper around a
/// `tokio_util::sync::CancellationToken`-like flag so call sites read the same regardless of
/// whether cancellation is session-scoped or command-scoped.
#[derive(Debug, Clone, Default)]
pub struct Ctx {
    cancelled: std::sync::Arc<tokio::sync::Notify>,
}

impl Ctx {
    /// A context that never cancels.
    pub fn background() -> Self {
        Ctx::default()
    }

    /// Resolves once the context has been cancelled.
    pub async fn cancelled(&self) {
        self.cancelled.notified().await
    }

    /// Cancels the context; idempotent in effect (subsequent calls just notify again).
    pub fn cancel(&self) {
        self.cancelled.notify_waiters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_renders_ls_string() {
        assert_eq!(Mode::synthesized_dir().to_ls_string(), "drwxr-xr-x");
        let file = Mode::from_bits_truncate(0o644);
        assert_eq!(file.to_ls_string(), "-rw-r--r--");
    }

    #[test]
    fn io_error_classification_not_found() {
        let e = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(VfsError::from(e).kind(), ErrorKind::NotExist);
    }
}

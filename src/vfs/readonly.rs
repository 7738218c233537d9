//! Wraps any [`Vfs`] and refuses mutation, stripping write bits from reported modes.

use super::{Ctx, ErrorKind, FileInfo, Mode, ReadStream, Vfs, VfsError};
use async_trait::async_trait;
use std::sync::Arc;

/// See module docs.
#[derive(Debug, Clone)]
pub struct ReadOnlyVfs {
    inner: Arc<dyn Vfs>,
}

impl ReadOnlyVfs {
    /// Wraps `inner`, presenting it read-only.
    pub fn new(inner: Arc<dyn Vfs>) -> Self {
        ReadOnlyVfs { inner }
    }

    fn strip_write(mut info: FileInfo) -> FileInfo {
        info.mode -= Mode::WRITE;
        info
    }
}

#[async_trait]
impl Vfs for ReadOnlyVfs {
    async fn open(&self, ctx: &Ctx, path: &str) -> Result<ReadStream, VfsError> {
        self.inner.open(ctx, path).await
    }

    async fn stat(&self, ctx: &Ctx, path: &str) -> Result<FileInfo, VfsError> {
        self.inner.stat(ctx, path).await.map(Self::strip_write)
    }

    async fn lstat(&self, ctx: &Ctx, path: &str) -> Result<FileInfo, VfsError> {
        self.inner.lstat(ctx, path).await.map(Self::strip_write)
    }

    async fn read_dir(&self, ctx: &Ctx, path: &str) -> Result<Vec<FileInfo>, VfsError> {
        Ok(self.inner.read_dir(ctx, path).await?.into_iter().map(Self::strip_write).collect())
    }

    async fn create(&self, _ctx: &Ctx, _path: &str, _body: ReadStream) -> Result<(), VfsError> {
        Err(ErrorKind::Permission.into())
    }

    async fn mkdir(&self, _ctx: &Ctx, _path: &str) -> Result<(), VfsError> {
        Err(ErrorKind::Permission.into())
    }

    async fn remove(&self, _ctx: &Ctx, _path: &str) -> Result<(), VfsError> {
        Err(ErrorKind::Permission.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::null::NullVfs;

    #[tokio::test]
    async fn mutating_ops_fail_permission() {
        let ro = ReadOnlyVfs::new(Arc::new(NullVfs));
        let ctx = Ctx::background();
        assert_eq!(ro.mkdir(&ctx, "/x").await.unwrap_err().kind(), ErrorKind::Permission);
        assert_eq!(ro.remove(&ctx, "/x").await.unwrap_err().kind(), ErrorKind::Permission);
    }

    #[tokio::test]
    async fn stat_strips_write_bits() {
        let ro = ReadOnlyVfs::new(Arc::new(NullVfs));
        let info = ro.stat(&Ctx::background(), "/").await.unwrap();
        assert!(!info.mode.contains(Mode::WRITE));
    }
}

//! A VFS that has no files: reads fail `NotExist`, writes succeed as no-ops, and listing the
//! root always succeeds with zero entries.

use super::{Ctx, ErrorKind, FileInfo, ReadStream, Vfs, VfsError};
use async_trait::async_trait;

/// See module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVfs;

#[async_trait]
impl Vfs for NullVfs {
    async fn open(&self, _ctx: &Ctx, _path: &str) -> Result<ReadStream, VfsError> {
        Err(ErrorKind::NotExist.into())
    }

    async fn stat(&self, _ctx: &Ctx, path: &str) -> Result<FileInfo, VfsError> {
        if path == "/" {
            Ok(FileInfo {
                name: "/".to_string(),
                size: 0,
                mod_time: None,
                mode: super::Mode::synthesized_dir(),
            })
        } else {
            Err(ErrorKind::NotExist.into())
        }
    }

    async fn read_dir(&self, _ctx: &Ctx, path: &str) -> Result<Vec<FileInfo>, VfsError> {
        if path == "/" {
            Ok(Vec::new())
        } else {
            Err(ErrorKind::NotExist.into())
        }
    }

    async fn create(&self, _ctx: &Ctx, _path: &str, mut body: ReadStream) -> Result<(), VfsError> {
        use tokio::io::AsyncReadExt;
        let mut sink = Vec::new();
        body.read_to_end(&mut sink).await.map_err(VfsError::from)?;
        Ok(())
    }

    async fn mkdir(&self, _ctx: &Ctx, _path: &str) -> Result<(), VfsError> {
        Ok(())
    }

    async fn remove(&self, _ctx: &Ctx, _path: &str) -> Result<(), VfsError> {
        Err(ErrorKind::NotExist.into())
    }
}

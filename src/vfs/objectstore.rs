//! Adapts a flat, S3-style object-key store to the hierarchical [`Vfs`] contract.

use super::{Ctx, ErrorKind, FileInfo, Mode, ReadStream, Vfs, VfsError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// One page of a `list(prefix, delimiter)` call.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Object keys that matched `prefix` with no further `delimiter` after it.
    pub contents: Vec<ObjectMeta>,
    /// Key prefixes formed by grouping on the first `delimiter` after `prefix`.
    pub common_prefixes: Vec<String>,
    /// Opaque continuation token; `None` once exhausted.
    pub next_token: Option<String>,
}

/// Metadata for a single object key as reported by the store.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    /// The full object key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified time.
    pub last_modified: SystemTime,
}

/// The boundary to a concrete object-store client (e.g. S3). Out of scope to implement
/// concretely; this crate ships the trait plus [`MemStore`] for tests.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Fetches the full body of `key`.
    async fn get(&self, key: &str) -> Result<ReadStream, StoreError>;

    /// Writes `body` (consumed to EOF) as `key`, with the given content type.
    async fn put(&self, key: &str, body: ReadStream, content_type: &str) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Lists keys starting with `prefix`, grouping on `delimiter` when present, returning at
    /// most `max_keys` entries (contents + common prefixes combined) starting at `token`.
    async fn list(&self, prefix: &str, delimiter: Option<&str>, max_keys: usize, token: Option<&str>) -> Result<ListPage, StoreError>;
}

/// Errors surfaced by an [`ObjectStore`], expressed as HTTP-ish status classes per §4.2.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP 404.
    #[error("object not found")]
    NotFound,
    /// HTTP 403.
    #[error("access denied")]
    Forbidden,
    /// Everything else.
    #[error("object store error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StoreError> for VfsError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ErrorKind::NotExist.into(),
            StoreError::Forbidden => ErrorKind::Permission.into(),
            StoreError::Other(src) => VfsError::new(ErrorKind::Internal, src),
        }
    }
}

/// Maps a configured `bucket` (carried by the concrete `ObjectStore`) plus `prefix` to VFS
/// semantics over a flat key store. See §4.2.
#[derive(Debug, Clone)]
pub struct ObjectStoreFs {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ObjectStoreFs {
    /// Builds an adapter rooted at `prefix` within `store`. `prefix` should not have a leading
    /// or trailing `/`; pass `""` to root the filesystem at the bucket itself.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        ObjectStoreFs {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    fn key(&self, path: &str) -> String {
        let trimmed = path.trim_start_matches('/');
        if self.prefix.is_empty() {
            trimmed.to_string()
        } else if trimmed.is_empty() {
            format!("{}/", self.prefix)
        } else {
            format!("{}/{}", self.prefix, trimmed)
        }
    }

    fn content_type(path: &str) -> &'static str {
        match path.rsplit('.').next() {
            Some("txt") => "text/plain",
            Some("html") | Some("htm") => "text/html",
            Some("json") => "application/json",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }

    fn base_name(key: &str) -> &str {
        key.trim_end_matches('/').rsplit('/').next().unwrap_or(key)
    }
}

#[async_trait]
impl Vfs for ObjectStoreFs {
    async fn open(&self, _ctx: &Ctx, path: &str) -> Result<ReadStream, VfsError> {
        Ok(self.store.get(&self.key(path)).await?)
    }

    async fn stat(&self, _ctx: &Ctx, path: &str) -> Result<FileInfo, VfsError> {
        if path == "/" || path.is_empty() {
            return Ok(FileInfo {
                name: "/".to_string(),
                size: 0,
                mod_time: None,
                mode: Mode::synthesized_dir(),
            });
        }
        let key = self.key(path);
        let page = self.store.list(&key, Some("/"), 1, None).await?;
        if page.common_prefixes.first().map(|p| p.as_str()) == Some(format!("{}/", key).as_str()) {
            Ok(FileInfo {
                name: Self::base_name(&key).to_string(),
                size: 0,
                mod_time: None,
                mode: Mode::synthesized_dir(),
            })
        } else if let Some(obj) = page.contents.first().filter(|o| o.key == key) {
            Ok(FileInfo {
                name: Self::base_name(&key).to_string(),
                size: obj.size,
                mod_time: Some(obj.last_modified),
                mode: Mode::from_bits_truncate(0o644),
            })
        } else {
            Err(ErrorKind::NotExist.into())
        }
    }

    async fn read_dir(&self, _ctx: &Ctx, path: &str) -> Result<Vec<FileInfo>, VfsError> {
        let dir_key = self.key(path);
        let prefix = if dir_key.is_empty() { String::new() } else if dir_key.ends_with('/') { dir_key } else { format!("{}/", dir_key) };

        let mut merged: BTreeMap<String, FileInfo> = BTreeMap::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.store.list(&prefix, Some("/"), 1000, token.as_deref()).await?;
            for common in &page.common_prefixes {
                let name = common.trim_end_matches('/').rsplit('/').next().unwrap_or(common).to_string();
                merged.insert(
                    name.clone(),
                    FileInfo {
                        name,
                        size: 0,
                        mod_time: None,
                        mode: Mode::synthesized_dir(),
                    },
                );
            }
            for obj in &page.contents {
                if obj.key == prefix {
                    continue;
                }
                let name = obj.key.rsplit('/').next().unwrap_or(&obj.key).to_string();
                merged.insert(
                    name.clone(),
                    FileInfo {
                        name,
                        size: obj.size,
                        mod_time: Some(obj.last_modified),
                        mode: Mode::from_bits_truncate(0o644),
                    },
                );
            }
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }
        Ok(merged.into_values().collect())
    }

    async fn create(&self, ctx: &Ctx, path: &str, body: ReadStream) -> Result<(), VfsError> {
        if self.stat(ctx, path).await.map(|i| i.is_dir()).unwrap_or(false) {
            return Err(ErrorKind::Permission.into());
        }
        self.store.put(&self.key(path), body, Self::content_type(path)).await?;
        Ok(())
    }

    async fn mkdir(&self, ctx: &Ctx, path: &str) -> Result<(), VfsError> {
        if self.stat(ctx, path).await.is_ok() {
            return Err(ErrorKind::Exists.into());
        }
        let key = format!("{}/", self.key(path).trim_end_matches('/'));
        let empty: ReadStream = Box::pin(std::io::Cursor::new(Vec::<u8>::new()));
        self.store.put(&key, empty, "application/x-directory").await?;
        Ok(())
    }

    async fn remove(&self, ctx: &Ctx, path: &str) -> Result<(), VfsError> {
        let info = self.stat(ctx, path).await?;
        let key = self.key(path);
        if info.is_dir() {
            let prefix = format!("{}/", key.trim_end_matches('/'));
            let page = self.store.list(&prefix, None, 1, None).await?;
            if !page.contents.is_empty() {
                return Err(ErrorKind::DirectoryNotEmpty.into());
            }
            self.store.delete(&prefix).await?;
        } else {
            self.store.delete(&key).await?;
        }
        Ok(())
    }
}

/// An in-memory [`ObjectStore`] used by tests and as a reference implementation of the trait.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    objects: Arc<Mutex<BTreeMap<String, (Vec<u8>, SystemTime)>>>,
}

impl MemStore {
    /// An empty store.
    pub fn new() -> Self {
        MemStore::default()
    }

    /// Seeds the store with `(key, contents)` pairs, all timestamped at `SystemTime::UNIX_EPOCH`.
    pub fn seeded(entries: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        let store = MemStore::new();
        let mut objects = store.objects.lock().unwrap();
        for (key, contents) in entries {
            objects.insert(key.to_string(), (contents.as_bytes().to_vec(), SystemTime::UNIX_EPOCH));
        }
        drop(objects);
        store
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn get(&self, key: &str) -> Result<ReadStream, StoreError> {
        let objects = self.objects.lock().unwrap();
        match objects.get(key) {
            Some((bytes, _)) => Ok(Box::pin(std::io::Cursor::new(bytes.clone()))),
            None => Err(StoreError::NotFound),
        }
    }

    async fn put(&self, key: &str, mut body: ReadStream, _content_type: &str) -> Result<(), StoreError> {
        use tokio::io::AsyncReadExt;
        let mut buf = Vec::new();
        body.read_to_end(&mut buf).await.map_err(|e| StoreError::Other(Box::new(e)))?;
        self.objects.lock().unwrap().insert(key.to_string(), (buf, SystemTime::now()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().unwrap();
        if key.ends_with('/') {
            objects.retain(|k, _| !k.starts_with(key.as_str()) && k != key.trim_end_matches('/'));
        } else {
            objects.remove(key);
        }
        Ok(())
    }

    async fn list(&self, prefix: &str, delimiter: Option<&str>, max_keys: usize, token: Option<&str>) -> Result<ListPage, StoreError> {
        let objects = self.objects.lock().unwrap();
        let mut contents = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();
        let start = token.unwrap_or("").to_string();

        for (key, (bytes, mtime)) in objects.range(start.clone()..) {
            if !key.starts_with(prefix) {
                if key.as_str() > prefix && !key.starts_with(prefix) {
                    break;
                }
                continue;
            }
            let rest = &key[prefix.len()..];
            if let Some(delim) = delimiter {
                if let Some(idx) = rest.find(delim) {
                    let grouped = format!("{}{}", prefix, &rest[..idx + delim.len()]);
                    if common_prefixes.last() != Some(&grouped) && !common_prefixes.contains(&grouped) {
                        common_prefixes.push(grouped);
                    }
                    continue;
                }
            }
            if key.ends_with('/') && rest.is_empty() {
                continue;
            }
            contents.push(ObjectMeta {
                key: key.clone(),
                size: bytes.len() as u64,
                last_modified: *mtime,
            });
        }

        common_prefixes.sort();
        contents.sort_by(|a, b| a.key.cmp(&b.key));

        // Merge contents and common prefixes into one key-ascending sequence before truncating,
        // so a page boundary can't drop one or the other out of order.
        enum Entry {
            Object(ObjectMeta),
            Prefix(String),
        }
        impl Entry {
            fn key(&self) -> &str {
                match self {
                    Entry::Object(o) => &o.key,
                    Entry::Prefix(p) => p,
                }
            }
        }
        let mut merged: Vec<Entry> = contents.into_iter().map(Entry::Object).chain(common_prefixes.into_iter().map(Entry::Prefix)).collect();
        merged.sort_by(|a, b| a.key().cmp(b.key()));

        let next_token = merged.get(max_keys).map(|e| e.key().to_string());
        merged.truncate(max_keys);

        let mut contents = Vec::new();
        let mut common_prefixes = Vec::new();
        for entry in merged {
            match entry {
                Entry::Object(o) => contents.push(o),
                Entry::Prefix(p) => common_prefixes.push(p),
            }
        }

        Ok(ListPage {
            contents,
            common_prefixes,
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stat_root_is_directory() {
        let fs = ObjectStoreFs::new(Arc::new(MemStore::new()), "");
        let info = fs.stat(&Ctx::background(), "/").await.unwrap();
        assert!(info.is_dir());
        assert!(info.mod_time.is_none());
    }

    #[tokio::test]
    async fn stat_classifies_file_and_directory() {
        let store = MemStore::seeded([("foo/bar/hoge.txt", "abc123"), ("hogehoge.txt", "foobar")]);
        let fs = ObjectStoreFs::new(Arc::new(store), "");
        assert!(fs.stat(&Ctx::background(), "/foo").await.unwrap().is_dir());
        assert!(!fs.stat(&Ctx::background(), "/hogehoge.txt").await.unwrap().is_dir());
        assert_eq!(fs.stat(&Ctx::background(), "/nope").await.unwrap_err().kind(), ErrorKind::NotExist);
    }

    #[tokio::test]
    async fn read_dir_merges_and_orders_by_name() {
        let store = MemStore::seeded([("foo/bar/hoge.txt", "abc123"), ("hogehoge.txt", "foobar")]);
        let fs = ObjectStoreFs::new(Arc::new(store), "");
        let entries = fs.read_dir(&Ctx::background(), "/").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "hogehoge.txt"]);
        assert!(entries[0].is_dir());
        assert_eq!(entries[1].size, 6);
    }

    #[tokio::test]
    async fn create_then_remove_roundtrip() {
        let fs = ObjectStoreFs::new(Arc::new(MemStore::new()), "bucket-prefix");
        let ctx = Ctx::background();
        let body: ReadStream = Box::pin(std::io::Cursor::new(b"hello".to_vec()));
        fs.create(&ctx, "/a.txt", body).await.unwrap();
        assert_eq!(fs.stat(&ctx, "/a.txt").await.unwrap().size, 5);
        fs.remove(&ctx, "/a.txt").await.unwrap();
        assert_eq!(fs.stat(&ctx, "/a.txt").await.unwrap_err().kind(), ErrorKind::NotExist);
    }

    #[tokio::test]
    async fn mkdir_rejects_existing_path() {
        let store = MemStore::seeded([("foo/bar.txt", "x")]);
        let fs = ObjectStoreFs::new(Arc::new(store), "");
        assert_eq!(fs.mkdir(&Ctx::background(), "/foo").await.unwrap_err().kind(), ErrorKind::Exists);
    }

    #[tokio::test]
    async fn remove_nonempty_directory_fails() {
        let store = MemStore::seeded([("foo/bar.txt", "x")]);
        let fs = ObjectStoreFs::new(Arc::new(store), "");
        assert_eq!(fs.remove(&Ctx::background(), "/foo").await.unwrap_err().kind(), ErrorKind::DirectoryNotEmpty);
    }
}

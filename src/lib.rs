#![deny(clippy::all)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! objectftpd is an async FTP(S) server that fronts an S3-style object store with a synthesized
//! hierarchical filesystem.
//!
//! It speaks the RFC 959 command set plus the RFC 2228 (security extensions), RFC 2389
//! (`FEAT`/`OPTS`), RFC 2428 (`EPRT`/`EPSV`), RFC 2577 (bounce-attack mitigation) and RFC 3659
//! (`SIZE`/`MDTM`) extensions commonly expected of modern clients, and runs on top of Tokio.
//!
//! # Quick start
//!
//! ```toml
//! [dependencies]
//! objectftpd = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ```no_run
//! use objectftpd::Server;
//! use objectftpd::auth::AnonymousAuthenticator;
//! use objectftpd::vfs::objectstore::{MemStore, ObjectStoreFs};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let vfs = Arc::new(ObjectStoreFs::new(Arc::new(MemStore::new()), ""));
//!     let server = Server::new(Arc::new(AnonymousAuthenticator::new(vfs))).build();
//!     server.listen("127.0.0.1:2121").await.unwrap();
//! }
//! ```

pub mod auth;
pub(crate) mod server;
pub mod vfs;

pub use crate::server::ftpserver::{error::ServerError, options, Server};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

//! The error type returned by [`Server::listen`](crate::Server::listen).

use crate::BoxError;
use crate::server::tls::TlsConfigError;
use std::net::AddrParseError;
use thiserror::Error;

/// Error returned by [`Server::listen`](crate::Server::listen).
#[derive(Error, Debug)]
#[error("server error: {msg}")]
pub struct ServerError {
    msg: String,
    #[source]
    source: BoxError,
}

impl ServerError {
    fn new<E: std::error::Error + Send + Sync + 'static>(msg: impl Into<String>, source: E) -> ServerError {
        ServerError {
            msg: msg.into(),
            source: Box::new(source),
        }
    }
}

impl From<AddrParseError> for ServerError {
    fn from(e: AddrParseError) -> Self {
        ServerError::new("could not parse address", e)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::new("io error", e)
    }
}

impl From<TlsConfigError> for ServerError {
    fn from(e: TlsConfigError) -> Self {
        ServerError::new("error with TLS configuration", e)
    }
}

/// Error returned by [`Server::shutdown`](crate::Server::shutdown).
#[derive(Error, Debug)]
#[error("shutdown error: {msg}")]
pub struct ShutdownError {
    pub(crate) msg: String,
}

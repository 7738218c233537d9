//! TLS configuration for both implicit (whole connection under TLS, ALPN `ftp`) and explicit
//! (`AUTH TLS` upgrades a plaintext connection mid-session) modes, per RFC 4217.

use derive_more::Display;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::{ServerSessionMemoryCache, WebPkiClientVerifier};
use rustls::{RootCertStore, ServerConfig};
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

/// How a listener negotiates TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// No TLS is offered on this listener.
    Off,
    /// The whole connection is TLS from the first byte (ALPN `ftp`), typically port 990.
    Implicit,
    /// The connection starts plaintext; `AUTH TLS` upgrades the control channel mid-session.
    Explicit,
}

/// Holds the shared [`TlsAcceptor`] used to wrap both the control channel (implicit/explicit) and
/// any data channel opened once `PROT P` is in effect.
#[derive(Clone)]
pub struct FtpsConfig {
    mode: TlsMode,
    acceptor: TlsAcceptor,
}

/// Failures building a [`FtpsConfig`] from a certificate chain and key.
#[derive(Debug, Display)]
pub enum TlsConfigError {
    /// `rustls` rejected the supplied certificate/key material.
    #[display("invalid TLS certificate or key material")]
    InvalidCertOrKey,
    /// Client-certificate auth was requested but no trust store was supplied.
    #[display("client auth requires a trust store")]
    MissingTrustStore,
    /// The supplied trust store or verifier could not be built.
    #[display("failed to build client certificate verifier")]
    InvalidTrustStore,
}

impl std::error::Error for TlsConfigError {}

impl FtpsConfig {
    /// Builds a new TLS configuration. `client_auth` requires `trust_store` to be `Some`.
    pub fn new(
        mode: TlsMode,
        cert_chain: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
        client_auth: bool,
        trust_store: Option<RootCertStore>,
    ) -> Result<Self, TlsConfigError> {
        let builder = ServerConfig::builder();
        let mut config = if client_auth {
            let roots = trust_store.ok_or(TlsConfigError::MissingTrustStore)?;
            let verifier = WebPkiClientVerifier::builder(Arc::new(roots)).build().map_err(|_| TlsConfigError::InvalidTrustStore)?;
            builder
                .with_client_cert_verifier(verifier)
                .with_single_cert(cert_chain, key)
                .map_err(|_| TlsConfigError::InvalidCertOrKey)?
        } else {
            builder.with_no_client_auth().with_single_cert(cert_chain, key).map_err(|_| TlsConfigError::InvalidCertOrKey)?
        };
        config.alpn_protocols = vec![b"ftp".to_vec()];
        config.session_storage = ServerSessionMemoryCache::new(256);

        Ok(FtpsConfig {
            mode,
            acceptor: TlsAcceptor::from(Arc::new(config)),
        })
    }

    /// The TLS mode this listener was configured with.
    pub fn mode(&self) -> TlsMode {
        self.mode
    }

    /// The acceptor used to wrap both control and data connections.
    pub fn acceptor(&self) -> TlsAcceptor {
        self.acceptor.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_trust_store_rejected_for_client_auth() {
        // The trust-store check happens before any cert parsing, so empty cert/key inputs are
        // fine for exercising this error path.
        let err = FtpsConfig::new(TlsMode::Implicit, vec![], PrivateKeyDer::Pkcs8(vec![].into()), true, None).unwrap_err();
        assert!(matches!(err, TlsConfigError::MissingTrustStore));
    }
}

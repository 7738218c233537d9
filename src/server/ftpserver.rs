//! The top-level [`Server`] handle: configuration, the listening accept loop, and graceful
//! shutdown.

pub mod error;
mod listen;
pub mod options;

use crate::auth::Authenticator;
use crate::server::shutdown::Notifier;
use crate::server::tls::FtpsConfig;
use error::{ServerError, ShutdownError};
use options::{PassiveHost, DEFAULT_GREETING, DEFAULT_PASSIVE_PORTS};
use slog::Drain;
use std::ops::Range;
use std::sync::Arc;
use tokio::net::ToSocketAddrs;

/// An instance of an FTP(S) server, authenticating against a pluggable
/// [`Authenticator`](crate::auth::Authenticator) and serving whatever [`Vfs`](crate::vfs::Vfs)
/// it hands back for each session.
///
/// Build one with [`Server::new`] and start it with [`Server::listen`].
///
/// # Example
///
/// ```no_run
/// use objectftpd::Server;
/// use objectftpd::auth::AnonymousAuthenticator;
/// use std::sync::Arc;
///
/// # async fn doc(vfs: Arc<dyn objectftpd::vfs::Vfs>) {
/// let server = Server::new(Arc::new(AnonymousAuthenticator::new(vfs)))
///     .greeting("Welcome")
///     .passive_ports(50000..50100)
///     .build();
/// server.listen("127.0.0.1:2121").await.unwrap();
/// # }
/// ```
pub struct Server {
    authenticator: Arc<dyn Authenticator>,
    greeting: String,
    passive_ports: Range<u16>,
    passive_host: PassiveHost,
    ftps: Option<FtpsConfig>,
    ftps_required: bool,
    enable_active_mode: bool,
    enable_address_check: bool,
    logger: slog::Logger,
    shutdown: Arc<Notifier>,
}

impl Server {
    /// Starts building a [`Server`] that authenticates with `authenticator`.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> ServerBuilder {
        ServerBuilder::new(authenticator)
    }

    /// Binds `bind_address` and serves control connections until the process is killed or
    /// [`Server::shutdown`] is called from another task. Accept errors are retried with
    /// exponential backoff; only a failure to bind the listening socket itself is returned.
    pub async fn listen<A: ToSocketAddrs>(&self, bind_address: A) -> Result<(), ServerError> {
        let params = listen::ListenParams {
            authenticator: self.authenticator.clone(),
            greeting: self.greeting.clone(),
            passive_ports: self.passive_ports.clone(),
            passive_host: self.passive_host,
            ftps: self.ftps.clone(),
            ftps_required: self.ftps_required,
            enable_active_mode: self.enable_active_mode,
            enable_address_check: self.enable_address_check,
            logger: self.logger.clone(),
        };
        listen::listen(bind_address, params, self.shutdown.clone()).await
    }

    /// Notifies every open session to close and waits for them to finish doing so.
    pub async fn shutdown(&self) -> Result<(), ShutdownError> {
        self.shutdown.notify().await;
        self.shutdown.linger().await;
        Ok(())
    }
}

/// Builds a [`Server`], defaulting to no TLS, active mode enabled, and address checking enabled
/// (RFC 2577 bounce-attack mitigation).
pub struct ServerBuilder {
    authenticator: Arc<dyn Authenticator>,
    greeting: String,
    passive_ports: Range<u16>,
    passive_host: PassiveHost,
    ftps: Option<FtpsConfig>,
    ftps_required: bool,
    enable_active_mode: bool,
    enable_address_check: bool,
    logger: slog::Logger,
}

impl ServerBuilder {
    /// See [`Server::new`].
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        ServerBuilder {
            authenticator,
            greeting: DEFAULT_GREETING.to_string(),
            passive_ports: DEFAULT_PASSIVE_PORTS,
            passive_host: PassiveHost::FromConnection,
            ftps: None,
            ftps_required: false,
            enable_active_mode: true,
            enable_address_check: true,
            logger: slog::Logger::root(slog_stdlog::StdLog.fuse(), slog::o!()),
        }
    }

    /// Sets the text sent in the `220` banner.
    pub fn greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// The port range `PASV`/`EPSV` allocate from.
    pub fn passive_ports(mut self, ports: Range<u16>) -> Self {
        self.passive_ports = ports;
        self
    }

    /// How the address in `PASV`/`EPSV` replies is chosen.
    pub fn passive_host(mut self, host: impl Into<PassiveHost>) -> Self {
        self.passive_host = host.into();
        self
    }

    /// Enables FTPS on this listener, in the mode carried by `ftps`.
    pub fn ftps(mut self, ftps: FtpsConfig) -> Self {
        self.ftps = Some(ftps);
        self
    }

    /// Rejects any command but `AUTH`/`FEAT`/`QUIT` until the control channel is under TLS.
    pub fn ftps_required(mut self, required: bool) -> Self {
        self.ftps_required = required;
        self
    }

    /// Whether `PORT`/`EPRT` are honored. Disabling this forces clients into passive mode.
    pub fn active_mode(mut self, enabled: bool) -> Self {
        self.enable_active_mode = enabled;
        self
    }

    /// Whether `PORT`/`EPRT` targets and passive-mode peers must match the control connection's
    /// peer address (RFC 2577 bounce-attack mitigation). Only disable this for interoperability
    /// testing behind address-translating proxies.
    pub fn address_check(mut self, enabled: bool) -> Self {
        self.enable_address_check = enabled;
        self
    }

    /// Overrides the default (stdlog-backed) logger.
    pub fn logger(mut self, logger: slog::Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Builds the [`Server`].
    pub fn build(self) -> Server {
        Server {
            authenticator: self.authenticator,
            greeting: self.greeting,
            passive_ports: self.passive_ports,
            passive_host: self.passive_host,
            ftps: self.ftps,
            ftps_required: self.ftps_required,
            enable_active_mode: self.enable_active_mode,
            enable_address_check: self.enable_address_check,
            logger: self.logger,
            shutdown: Arc::new(Notifier::new()),
        }
    }
}

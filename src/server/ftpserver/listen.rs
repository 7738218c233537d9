//! The accept loop: binds the control port and spawns a control channel loop per connection.
//!
//! Transient accept errors (the process briefly running out of file descriptors, a half-open
//! connection reset before `accept` finishes) are retried with exponential backoff instead of
//! tearing down the listener; a full listener restart is reserved for errors binding the socket
//! in the first place.

use super::options::PassiveHost;
use super::ServerError;
use crate::auth::Authenticator;
use crate::server::controlchan;
use crate::server::portpool::PortPool;
use crate::server::session::SessionConfig;
use crate::server::shutdown;
use crate::server::tls::FtpsConfig;
use socket2::{SockRef, TcpKeepalive};
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, ToSocketAddrs};

const INITIAL_BACKOFF: Duration = Duration::from_millis(10);
const MAX_BACKOFF: Duration = Duration::from_secs(1);
const KEEPALIVE_IDLE: Duration = Duration::from_secs(180);

/// Everything [`listen`] needs to build a [`SessionConfig`] per accepted connection.
pub(crate) struct ListenParams {
    pub(crate) authenticator: Arc<dyn Authenticator>,
    pub(crate) greeting: String,
    pub(crate) passive_ports: Range<u16>,
    pub(crate) passive_host: PassiveHost,
    pub(crate) ftps: Option<FtpsConfig>,
    pub(crate) ftps_required: bool,
    pub(crate) enable_active_mode: bool,
    pub(crate) enable_address_check: bool,
    pub(crate) logger: slog::Logger,
}

pub(crate) async fn listen<A: ToSocketAddrs>(bind_address: A, params: ListenParams, shutdown_notifier: Arc<shutdown::Notifier>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind_address).await?;
    let port_pool = Arc::new(PortPool::new(params.passive_ports.start, params.passive_ports.end.saturating_sub(1)));
    let mut backoff = INITIAL_BACKOFF;
    let mut accept_shutdown = shutdown_notifier.subscribe().await;

    loop {
        let accepted = tokio::select! {
            biased;
            _ = accept_shutdown.listen() => {
                slog::info!(params.logger, "accept loop stopping, shutdown requested");
                break;
            }
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer_addr)) => {
                backoff = INITIAL_BACKOFF;
                let keepalive = TcpKeepalive::new().with_time(KEEPALIVE_IDLE);
                if let Err(e) = SockRef::from(&stream).set_tcp_keepalive(&keepalive) {
                    slog::warn!(params.logger, "failed to set keepalive on accepted connection"; "peer" => %peer_addr, "error" => %e);
                }
                let local_addr = stream.local_addr()?;
                let passive_host = match params.passive_host {
                    PassiveHost::FromConnection => local_addr.ip(),
                    PassiveHost::Ip(ip) => ip,
                };
                let config = SessionConfig {
                    greeting: params.greeting.clone(),
                    authenticator: params.authenticator.clone(),
                    port_pool: port_pool.clone(),
                    ftps: params.ftps.clone(),
                    ftps_required: params.ftps_required,
                    passive_host,
                    enable_active_mode: params.enable_active_mode,
                    enable_address_check: params.enable_address_check,
                    logger: params.logger.clone(),
                };
                let shutdown_listener = shutdown_notifier.subscribe().await;
                slog::info!(params.logger, "accepted control connection"; "peer" => %peer_addr);
                controlchan::spawn_control_channel_loop(stream, peer_addr, local_addr, config, shutdown_listener);
            }
            Err(e) => {
                slog::warn!(params.logger, "error accepting control connection, retrying"; "error" => %e, "backoff_ms" => backoff.as_millis() as u64);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }

    Ok(())
}

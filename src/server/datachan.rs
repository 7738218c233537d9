//! The data channel: at most one per session, created by PORT/EPRT/PASV/EPSV and torn down by the
//! next such command or session close.

use super::portpool::{PortPool, PortPoolError};
use super::tls::FtpsConfig;
use crate::vfs::Ctx;
use derive_more::Display;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_rustls::server::TlsStream;

/// Either a plain TCP data connection or one wrapped in TLS (once `PROT P` is in effect over a
/// TLS control channel).
pub enum DataStream {
    /// Unencrypted.
    Plain(TcpStream),
    /// Encrypted under the same certificate as the control channel.
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for DataStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DataStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            DataStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for DataStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            DataStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            DataStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DataStream::Plain(s) => Pin::new(s).poll_flush(cx),
            DataStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DataStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            DataStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Failures establishing or using a data connection.
#[derive(Debug, Display)]
pub enum DataChanError {
    /// `PORT`/`EPRT` named a port below 1024, or (with address-checking enabled) an address that
    /// doesn't match the control connection's peer. RFC 2577 bounce-attack mitigation.
    #[display("refused PORT/EPRT target (bounce-attack guard)")]
    BounceAttack,
    /// The passive port pool could not hand out a port.
    #[display("{_0}")]
    PortPool(PortPoolError),
    /// `conn()` was called with no transfer set up, or after it was already closed.
    #[display("data connection already closed")]
    AlreadyClosed,
    /// The per-command context was cancelled before a passive peer connected.
    #[display("data connection cancelled")]
    Cancelled,
    /// Underlying I/O failure.
    #[display("data channel I/O error")]
    Io(io::Error),
}

impl std::error::Error for DataChanError {}

impl From<io::Error> for DataChanError {
    fn from(e: io::Error) -> Self {
        DataChanError::Io(e)
    }
}

impl From<PortPoolError> for DataChanError {
    fn from(e: PortPoolError) -> Self {
        DataChanError::PortPool(e)
    }
}

/// The current data channel for a session: none, one eagerly-dialed active connection, or a
/// passive listener awaiting its first (and only) accepted peer.
pub enum DataTransfer {
    /// No data channel set up.
    None,
    /// PORT/EPRT: already connected.
    Active { stream: DataStream },
    /// PASV/EPSV: listening, waiting for the client to dial in.
    Passive {
        port: u16,
        accept_rx: Option<oneshot::Receiver<io::Result<DataStream>>>,
        cached: Option<DataStream>,
    },
}

impl DataTransfer {
    /// Dials an active (PORT/EPRT) data connection. `peer_ip`, when address-checking is enabled,
    /// must equal the dialed address' IP.
    pub async fn active(peer_ip: Option<IpAddr>, addr: SocketAddr, tls: Option<&FtpsConfig>) -> Result<Self, DataChanError> {
        if addr.port() < 1024 {
            return Err(DataChanError::BounceAttack);
        }
        if let Some(expected) = peer_ip {
            if addr.ip() != expected {
                return Err(DataChanError::BounceAttack);
            }
        }
        let stream = TcpStream::connect(addr).await?;
        let stream = wrap_tls_client_side(stream, tls).await?;
        Ok(DataTransfer::Active { stream })
    }

    /// Opens a passive (PASV/EPSV) listener, allocating a port from `pool`, and spawns a
    /// background acceptor that publishes the first address-gate-passing connection.
    pub async fn passive(pool: Arc<PortPool>, bind_ip: IpAddr, peer_ip: Option<IpAddr>, tls: Option<FtpsConfig>) -> Result<Self, DataChanError> {
        let port = pool.choose()?;
        let listener = match TcpListener::bind(SocketAddr::new(bind_ip, port)).await {
            Ok(l) => l,
            Err(e) => {
                pool.release(port);
                return Err(e.into());
            }
        };
        let local_port = listener.local_addr()?.port();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((sock, remote)) => {
                        if let Some(expected) = peer_ip {
                            if remote.ip() != expected {
                                continue;
                            }
                        }
                        let wrapped = wrap_tls_server_side(sock, tls.as_ref()).await;
                        let _ = tx.send(wrapped);
                        return;
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                }
            }
        });
        Ok(DataTransfer::Passive {
            port: local_port,
            accept_rx: Some(rx),
            cached: None,
        })
    }

    /// The listening port, for PASV/EPSV replies. `None` for `Active`/`None`.
    pub fn passive_port(&self) -> Option<u16> {
        match self {
            DataTransfer::Passive { port, .. } => Some(*port),
            _ => None,
        }
    }

    /// Returns the established connection, blocking (cooperatively) for a passive peer to dial in
    /// if necessary, or until `ctx` cancels.
    pub async fn conn(&mut self, ctx: &Ctx) -> Result<&mut DataStream, DataChanError> {
        match self {
            DataTransfer::None => Err(DataChanError::AlreadyClosed),
            DataTransfer::Active { stream } => Ok(stream),
            DataTransfer::Passive { accept_rx, cached, .. } => {
                if cached.is_none() {
                    let rx = accept_rx.take().ok_or(DataChanError::AlreadyClosed)?;
                    let stream = tokio::select! {
                        res = rx => res.map_err(|_| DataChanError::AlreadyClosed)??,
                        _ = ctx.cancelled() => return Err(DataChanError::Cancelled),
                    };
                    *cached = Some(stream);
                }
                Ok(cached.as_mut().expect("just populated"))
            }
        }
    }

    /// Releases any passive port back to `pool` and drops the connection. Idempotent.
    pub fn close(&mut self, pool: &PortPool) {
        if let DataTransfer::Passive { port, .. } = self {
            pool.release(*port);
        }
        *self = DataTransfer::None;
    }

    /// Takes ownership of the connection established by a prior [`DataTransfer::conn`] call,
    /// leaving `self` as `None` and releasing any passive port back to `pool`. A data-transfer
    /// command owns its connection's only use, so there's never a reason to hand the same stream
    /// out twice.
    pub fn take_stream(&mut self, pool: &PortPool) -> Option<DataStream> {
        match std::mem::replace(self, DataTransfer::None) {
            DataTransfer::Active { stream } => Some(stream),
            DataTransfer::Passive { port, cached: Some(stream), .. } => {
                pool.release(port);
                Some(stream)
            }
            other => {
                *self = other;
                None
            }
        }
    }
}

async fn wrap_tls_client_side(stream: TcpStream, tls: Option<&FtpsConfig>) -> Result<DataStream, DataChanError> {
    match tls {
        None => Ok(DataStream::Plain(stream)),
        Some(cfg) => {
            let acceptor = cfg.acceptor();
            let tls_stream = acceptor.accept(stream).await?;
            Ok(DataStream::Tls(Box::new(tls_stream)))
        }
    }
}

async fn wrap_tls_server_side(stream: TcpStream, tls: Option<&FtpsConfig>) -> io::Result<DataStream> {
    match tls {
        None => Ok(DataStream::Plain(stream)),
        Some(cfg) => {
            let acceptor = cfg.acceptor();
            let tls_stream = acceptor.accept(stream).await?;
            Ok(DataStream::Tls(Box::new(tls_stream)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn active_rejects_privileged_port() {
        let err = DataTransfer::active(None, "127.0.0.1:80".parse().unwrap(), None).await.unwrap_err();
        assert!(matches!(err, DataChanError::BounceAttack));
    }

    #[tokio::test]
    async fn active_rejects_mismatched_peer_ip() {
        let expected: IpAddr = "192.0.2.1".parse().unwrap();
        let err = DataTransfer::active(Some(expected), "192.0.2.3:2000".parse().unwrap(), None).await.unwrap_err();
        assert!(matches!(err, DataChanError::BounceAttack));
    }

    #[tokio::test]
    async fn conn_on_none_fails_already_closed() {
        let mut dt = DataTransfer::None;
        let ctx = Ctx::background();
        let err = dt.conn(&ctx).await.unwrap_err();
        assert!(matches!(err, DataChanError::AlreadyClosed));
    }
}

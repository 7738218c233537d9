//! Drives a single control connection end to end: greeting, command dispatch loop, the
//! AUTH-TLS upgrade handshake, and graceful shutdown.

use super::codecs::TelnetCodec;
use super::command::Command;
use super::commands;
use super::error::ControlChanError;
use super::handler::CommandContext;
use super::reply::{Reply, ReplyCode};
use crate::server::password::Password;
use crate::server::session::{Session, SessionConfig};
use crate::server::shutdown;
use crate::server::tls::TlsMode;
use futures_util::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_rustls::server::TlsStream;
use tokio_util::codec::Framed;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Either side of the `AUTH TLS` upgrade: a bare TCP stream, or one wrapped in TLS (from the
/// first byte, for an implicit-TLS listener).
enum ControlStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for ControlStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ControlStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            ControlStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ControlStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            ControlStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            ControlStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ControlStream::Plain(s) => Pin::new(s).poll_flush(cx),
            ControlStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ControlStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            ControlStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Accepts ownership of a freshly-accepted TCP connection and spawns its control loop in its own
/// task. Errors are logged, not propagated: a single misbehaving client must never take the
/// listener down.
pub(crate) fn spawn_control_channel_loop(stream: TcpStream, peer_addr: SocketAddr, local_addr: SocketAddr, config: SessionConfig, shutdown_listener: shutdown::Listener) {
    let logger = config.logger.clone();
    tokio::spawn(async move {
        if let Err(e) = run(stream, peer_addr, local_addr, config, shutdown_listener).await {
            slog::warn!(logger, "control channel for {} ended with an error"; "peer" => %peer_addr, "error" => %e);
        }
    });
}

async fn run(stream: TcpStream, peer_addr: SocketAddr, local_addr: SocketAddr, config: SessionConfig, shutdown_listener: shutdown::Listener) -> Result<(), ControlChanError> {
    let _ = stream.set_nodelay(true);

    let implicit_tls = matches!(config.ftps.as_ref().map(|t| t.mode()), Some(TlsMode::Implicit));
    let control_stream = if implicit_tls {
        let acceptor = config.ftps.as_ref().expect("implicit_tls implies ftps is Some").acceptor();
        ControlStream::Tls(Box::new(acceptor.accept(stream).await?))
    } else {
        ControlStream::Plain(stream)
    };

    let id = uuid::Uuid::new_v4().simple().to_string();
    let mut session = Session::new(id, peer_addr, local_addr, shutdown_listener);
    session.control_tls = implicit_tls;

    let mut framed = Framed::new(control_stream, TelnetCodec::new());
    framed.send(Reply::new(ReplyCode::ServiceReady, config.greeting.clone())).await?;

    let (reply_tx, mut reply_rx) = mpsc::channel::<Reply>(8);

    loop {
        if session.shutdown_listener.is_shutdown() && !session.is_executing() && matches!(*session.data_transfer.lock().await, crate::server::datachan::DataTransfer::None) {
            break;
        }

        tokio::select! {
            biased;

            reply = reply_rx.recv() => {
                if let Some(reply) = reply {
                    framed.send(reply).await?;
                }
            }

            _ = tokio::time::sleep(SHUTDOWN_POLL_INTERVAL), if session.shutdown_listener.is_shutdown() => {
                continue;
            }

            next = framed.next() => {
                match next {
                    None => break,
                    Some(Err(e)) => return Err(e),
                    Some(Ok(cmd)) => {
                        // `dispatch` may enqueue a provisional reply (e.g. `150`) on `reply_tx`
                        // partway through, from inside a data-transfer command's `execute`. Drain
                        // `reply_rx` concurrently so that reply reaches the wire before the final
                        // one, instead of sitting buffered until `dispatch` resolves.
                        let reply = {
                            let mut dispatch_fut = std::pin::pin!(dispatch(cmd, &mut session, &config, reply_tx.clone()));
                            loop {
                                tokio::select! {
                                    biased;
                                    r = &mut dispatch_fut => break r,
                                    Some(provisional) = reply_rx.recv() => {
                                        framed.send(provisional).await?;
                                    }
                                }
                            }
                        };
                        if !matches!(reply, Reply::None) {
                            framed.send(reply).await?;
                        }
                        if session.request_tls_upgrade {
                            let cfg = config.ftps.clone().expect("AUTH handler only sets this when ftps is configured");
                            let plain = match framed.into_inner() {
                                ControlStream::Plain(s) => s,
                                ControlStream::Tls(_) => return Err(ControlChanError::from(super::error::ControlChanErrorKind::InternalServerError)),
                            };
                            let tls_stream = cfg.acceptor().accept(plain).await?;
                            framed = Framed::new(ControlStream::Tls(Box::new(tls_stream)), TelnetCodec::new());
                            session.control_tls = true;
                            session.request_tls_upgrade = false;
                        }
                        if session.quit {
                            let _ = framed.flush().await;
                            break;
                        }
                    }
                }
            }
        }
    }

    session.data_transfer.lock().await.close(&config.port_pool);
    Ok(())
}

async fn dispatch(cmd: Command, session: &mut Session, config: &SessionConfig, async_replies: mpsc::Sender<Reply>) -> Reply {
    if session.shutdown_listener.is_shutdown() {
        return Reply::new(ReplyCode::ServiceNotAvailable, "Server is shutting down");
    }

    if cmd.name == "PASS" {
        slog::debug!(config.logger, "command"; "verb" => %cmd.name, "arg" => %Password::from(cmd.arg.as_str()));
    } else {
        slog::debug!(config.logger, "command"; "verb" => %cmd.name, "arg" => %cmd.arg);
    }

    let handler = match commands::lookup(&cmd.name) {
        Some(h) => h,
        None => return Reply::new(ReplyCode::CommandSyntaxError, format!("Unknown command {}", cmd.name)),
    };

    if handler.needs_param() && cmd.arg.is_empty() {
        return Reply::new(ReplyCode::ParameterSyntaxError, "Missing argument");
    }
    if handler.needs_auth() && session.vfs.is_none() {
        return Reply::new(ReplyCode::NotLoggedIn, "Please login with USER and PASS");
    }
    if !matches!(cmd.name.as_str(), "RNFR" | "RNTO") {
        session.rename_from = None;
        session.rename_source = None;
    }

    session.mark_executing(true);
    let reply = {
        let mut cmd_ctx = CommandContext {
            session,
            arg: &cmd.arg,
            config,
            async_replies,
        };
        match tokio::time::timeout(COMMAND_TIMEOUT, handler.execute(&mut cmd_ctx)).await {
            Ok(reply) => reply,
            Err(_) => Reply::new(ReplyCode::ServiceNotAvailable, "Command timed out"),
        }
    };
    session.mark_executing(false);
    reply
}

//! Shared plumbing for the commands that move bytes over the data channel: acquiring the
//! connection set up by a prior PORT/EPRT/PASV/EPSV, sending the provisional `150`, and mapping
//! data-channel failures onto reply codes.

use crate::server::controlchan::handler::CommandContext;
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::{DataChanError, DataStream};
use crate::vfs::Ctx;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Waits for the data connection to be ready (dialing out for active, accepting for passive),
/// takes ownership of it, and sends `150` on the control channel. The returned [`Ctx`] is also
/// stashed on the session so `ABOR` can cancel an in-flight transfer.
pub(super) async fn open(ctx: &mut CommandContext<'_>, opening_msg: &str) -> Result<(DataStream, Ctx), Reply> {
    let transfer_ctx = Ctx::background();
    let data_transfer = ctx.session.data_transfer.clone();
    let mut guard = data_transfer.lock().await;
    if let Err(e) = guard.conn(&transfer_ctx).await {
        return Err(data_chan_error_reply(e));
    }
    let stream = guard.take_stream(&ctx.config.port_pool).ok_or(Reply::new(ReplyCode::CantOpenDataConnection, "Use PORT or PASV first"))?;
    drop(guard);
    *ctx.session.transfer_ctx.lock().expect("transfer_ctx mutex poisoned") = Some(transfer_ctx.clone());
    let _ = ctx.async_replies.send(Reply::new(ReplyCode::FileStatusOkay, opening_msg)).await;
    Ok((stream, transfer_ctx))
}

/// Clears the `ABOR`-cancellable context stashed by [`open`]. Call once the transfer finishes,
/// regardless of outcome.
pub(super) fn finish(ctx: &mut CommandContext<'_>) {
    *ctx.session.transfer_ctx.lock().expect("transfer_ctx mutex poisoned") = None;
}

/// Copies `reader` to `writer` in 64KiB chunks, honoring cancellation from `ctx` (set by `ABOR`).
pub(super) async fn copy_cancellable<R, W>(mut reader: R, mut writer: W, ctx: &Ctx) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    use tokio::io::AsyncReadExt;
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = tokio::select! {
            res = reader.read(&mut buf) => res?,
            _ = ctx.cancelled() => return Err(std::io::Error::new(std::io::ErrorKind::Interrupted, "transfer aborted")),
        };
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        total += n as u64;
    }
    writer.flush().await?;
    Ok(total)
}

pub(super) fn data_chan_error_reply(e: DataChanError) -> Reply {
    match e {
        DataChanError::BounceAttack => Reply::new(ReplyCode::CantOpenDataConnection, "Refused data connection"),
        DataChanError::PortPool(_) => Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection"),
        DataChanError::AlreadyClosed => Reply::new(ReplyCode::CantOpenDataConnection, "Use PORT or PASV first"),
        DataChanError::Cancelled => Reply::new(ReplyCode::ConnectionClosed, "Transfer aborted"),
        DataChanError::Io(_) => Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection"),
    }
}

pub(super) fn io_error_reply(e: std::io::Error) -> Reply {
    if e.kind() == std::io::ErrorKind::Interrupted {
        Reply::new(ReplyCode::ConnectionClosed, "Transfer aborted")
    } else {
        Reply::new(ReplyCode::LocalError, "Transfer failed")
    }
}

pub(super) fn vfs_error_reply(e: crate::vfs::VfsError) -> Reply {
    use crate::vfs::ErrorKind;
    match e.kind() {
        ErrorKind::NotExist => Reply::new(ReplyCode::FileError, "File not found"),
        ErrorKind::Exists => Reply::new(ReplyCode::FileError, "File already exists"),
        ErrorKind::Permission => Reply::new(ReplyCode::FileError, "Permission denied"),
        ErrorKind::DirectoryNotEmpty => Reply::new(ReplyCode::FileError, "Directory not empty"),
        ErrorKind::Internal => Reply::new(ReplyCode::LocalError, "Internal error"),
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Reads `first` to EOF, then `second`. The object store has no partial-write append, so `APPE`
/// re-creates the object from the concatenation of its old content and the incoming stream.
struct Chain<A, B> {
    first: Option<A>,
    second: B,
}

impl<A: AsyncRead + Unpin, B: AsyncRead + Unpin> AsyncRead for Chain<A, B> {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        if let Some(first) = self.first.as_mut() {
            let before = buf.filled().len();
            match Pin::new(first).poll_read(cx, buf) {
                Poll::Ready(Ok(())) if buf.filled().len() > before => return Poll::Ready(Ok(())),
                Poll::Ready(Ok(())) => self.first = None,
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending => return Poll::Pending,
            }
        }
        Pin::new(&mut self.second).poll_read(cx, buf)
    }
}

/// `APPE path`: concatenates any existing content at `path` with the incoming data stream and
/// re-creates the object from the result.
#[derive(Debug, Default)]
pub struct Appe;

#[async_trait]
impl CommandHandler for Appe {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let vfs = ctx.session.vfs().expect("needs_auth guarantees a vfs");
        let path = ctx.session.resolve(ctx.arg);

        let existing = match vfs.open(&ctx.session.ctx, &path).await {
            Ok(reader) => Some(reader),
            Err(e) if e.kind() == crate::vfs::ErrorKind::NotExist => None,
            Err(e) => return super::transfer::vfs_error_reply(e),
        };

        let (stream, transfer_ctx) = match super::transfer::open(ctx, &format!("Opening data connection for {}", path)).await {
            Ok(x) => x,
            Err(r) => return r,
        };
        let body = Chain { first: existing, second: stream };
        let result = vfs.create(&transfer_ctx, &path, Box::pin(body)).await;
        super::transfer::finish(ctx);
        match result {
            Ok(()) => Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete"),
            Err(e) => super::transfer::vfs_error_reply(e),
        }
    }
}

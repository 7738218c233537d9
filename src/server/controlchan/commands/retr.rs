use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `RETR path`: streams the file's content out over the data channel.
#[derive(Debug, Default)]
pub struct Retr;

#[async_trait]
impl CommandHandler for Retr {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let vfs = ctx.session.vfs().expect("needs_auth guarantees a vfs");
        let path = ctx.session.resolve(ctx.arg);
        let file = match vfs.open(&ctx.session.ctx, &path).await {
            Ok(f) => f,
            Err(e) => return super::transfer::vfs_error_reply(e),
        };

        let (stream, transfer_ctx) = match super::transfer::open(ctx, &format!("Opening data connection for {}", path)).await {
            Ok(x) => x,
            Err(r) => return r,
        };
        let result = super::transfer::copy_cancellable(file, stream, &transfer_ctx).await;
        super::transfer::finish(ctx);
        match result {
            Ok(_) => Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete"),
            Err(e) => super::transfer::io_error_reply(e),
        }
    }
}

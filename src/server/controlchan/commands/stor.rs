use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `STOR path`: accepts a file's content over the data channel and writes it, overwriting any
/// existing object at `path`.
#[derive(Debug, Default)]
pub struct Stor;

#[async_trait]
impl CommandHandler for Stor {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let vfs = ctx.session.vfs().expect("needs_auth guarantees a vfs");
        let path = ctx.session.resolve(ctx.arg);

        let (stream, transfer_ctx) = match super::transfer::open(ctx, &format!("Opening data connection for {}", path)).await {
            Ok(x) => x,
            Err(r) => return r,
        };
        let result = vfs.create(&transfer_ctx, &path, Box::pin(stream)).await;
        super::transfer::finish(ctx);
        match result {
            Ok(()) => Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete"),
            Err(e) => super::transfer::vfs_error_reply(e),
        }
    }
}

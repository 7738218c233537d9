use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `DELE <path>`: removes a (regular) file.
#[derive(Debug, Default)]
pub struct Dele;

#[async_trait]
impl CommandHandler for Dele {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.remove(&ctx.session.ctx, &target).await {
            Ok(()) => Reply::new(ReplyCode::FileActionOkay, "File successfully removed"),
            Err(_) => Reply::new(ReplyCode::FileError, "Failed to remove file"),
        }
    }
}

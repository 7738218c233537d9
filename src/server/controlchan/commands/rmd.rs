use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `RMD <path>`: removes an (empty) directory.
#[derive(Debug, Default)]
pub struct Rmd;

#[async_trait]
impl CommandHandler for Rmd {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.remove(&ctx.session.ctx, &target).await {
            Ok(()) => Reply::new(ReplyCode::FileActionOkay, "Directory successfully removed"),
            Err(_) => Reply::new(ReplyCode::FileError, "Failed to remove directory"),
        }
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `RNTO <path>`: consumes the `RNFR`-staged source, streaming it into the new path, then removes
/// the original.
#[derive(Debug, Default)]
pub struct Rnto;

#[async_trait]
impl CommandHandler for Rnto {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let Some(source_path) = ctx.session.rename_from.take() else {
            return Reply::new(ReplyCode::BadCommandSequence, "RNFR required first");
        };
        let Some(source) = ctx.session.rename_source.take() else {
            return Reply::new(ReplyCode::BadCommandSequence, "RNFR required first");
        };
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };

        if vfs.create(&ctx.session.ctx, &target, source).await.is_err() {
            return Reply::new(ReplyCode::FileError, "Rename failed");
        }
        if vfs.remove(&ctx.session.ctx, &source_path).await.is_err() {
            return Reply::new(ReplyCode::FileError, "Rename failed to clean up source");
        }
        Reply::new(ReplyCode::FileActionOkay, "Rename successful")
    }
}

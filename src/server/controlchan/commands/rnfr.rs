use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `RNFR <path>`: opens `path` for read and stages it, awaiting a matching `RNTO`.
#[derive(Debug, Default)]
pub struct Rnfr;

#[async_trait]
impl CommandHandler for Rnfr {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.open(&ctx.session.ctx, &target).await {
            Ok(stream) => {
                ctx.session.rename_from = Some(target);
                ctx.session.rename_source = Some(stream);
                Reply::new(ReplyCode::FileActionPending, "Ready for RNTO")
            }
            Err(_) => Reply::new(ReplyCode::FileError, "File does not exist"),
        }
    }
}

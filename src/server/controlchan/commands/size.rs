use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `SIZE <path>`: the file's size in bytes, per RFC 3659.
#[derive(Debug, Default)]
pub struct Size;

#[async_trait]
impl CommandHandler for Size {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.stat(&ctx.session.ctx, &target).await {
            Ok(info) if !info.is_dir() => Reply::new(ReplyCode::FileStatus, info.size.to_string()),
            Ok(_) => Reply::new(ReplyCode::FileError, "Not a regular file"),
            Err(_) => Reply::new(ReplyCode::FileError, "Could not get file size"),
        }
    }
}

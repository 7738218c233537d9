use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `CWD <path>`: changes the working directory if `path` stats as a directory.
#[derive(Debug, Default)]
pub struct Cwd;

#[async_trait]
impl CommandHandler for Cwd {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.stat(&ctx.session.ctx, &target).await {
            Ok(info) if info.is_dir() => {
                ctx.session.pwd = target;
                Reply::new(ReplyCode::FileActionOkay, "Directory successfully changed")
            }
            Ok(_) => Reply::new(ReplyCode::FileError, "Not a directory"),
            Err(_) => Reply::new(ReplyCode::FileError, "Failed to change directory"),
        }
    }
}

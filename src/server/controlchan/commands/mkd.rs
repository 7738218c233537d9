use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::quote_path;
use crate::vfs::ErrorKind;
use async_trait::async_trait;

/// `MKD <path>`: creates a directory, replying with the quoted absolute path on success.
#[derive(Debug, Default)]
pub struct Mkd;

#[async_trait]
impl CommandHandler for Mkd {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.mkdir(&ctx.session.ctx, &target).await {
            Ok(()) => Reply::new(ReplyCode::DirCreated, format!("{} directory created", quote_path(&target))),
            Err(e) if e.kind() == ErrorKind::Exists => Reply::new(ReplyCode::DirectoryExists, "Directory already exists"),
            Err(_) => Reply::new(ReplyCode::FileError, "Failed to create directory"),
        }
    }
}

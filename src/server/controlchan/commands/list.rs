use super::listing::format_list_line;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;
use std::io::Cursor;

/// `LIST [path]`: a Unix `ls -l`-style directory (or single-file) listing over the data channel.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let vfs = ctx.session.vfs().expect("needs_auth guarantees a vfs");
        let path = if ctx.arg.trim().is_empty() { ctx.session.pwd.clone() } else { ctx.session.resolve(ctx.arg) };
        let entries = match vfs.read_dir(&ctx.session.ctx, &path).await {
            Ok(entries) => entries,
            Err(dir_err) => match vfs.stat(&ctx.session.ctx, &path).await {
                Ok(info) => vec![info],
                Err(_) => return super::transfer::vfs_error_reply(dir_err),
            },
        };
        let owner = ctx.session.user.as_deref().unwrap_or("ftp");
        let body: String = entries.iter().map(|info| format!("{}\r\n", format_list_line(info, owner))).collect();

        let (stream, transfer_ctx) = match super::transfer::open(ctx, "Opening ASCII mode data connection for file list").await {
            Ok(x) => x,
            Err(r) => return r,
        };
        let result = super::transfer::copy_cancellable(Cursor::new(body.into_bytes()), stream, &transfer_ctx).await;
        super::transfer::finish(ctx);
        match result {
            Ok(_) => Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete"),
            Err(e) => super::transfer::io_error_reply(e),
        }
    }
}

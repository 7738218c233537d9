use super::listing::format_nlst_line;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;
use std::io::Cursor;

/// `NLST [path]`: bare file names over the data channel, one per line.
#[derive(Debug, Default)]
pub struct Nlst;

#[async_trait]
impl CommandHandler for Nlst {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let vfs = ctx.session.vfs().expect("needs_auth guarantees a vfs");
        let path = if ctx.arg.trim().is_empty() { ctx.session.pwd.clone() } else { ctx.session.resolve(ctx.arg) };
        let entries = match vfs.read_dir(&ctx.session.ctx, &path).await {
            Ok(entries) => entries,
            Err(e) => return super::transfer::vfs_error_reply(e),
        };
        let body: String = entries.iter().map(|info| format!("{}\r\n", format_nlst_line(info))).collect();

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

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::quote_path;
use async_trait::async_trait;

/// `STOU`: stores under a server-chosen, collision-free name in the current directory, per RFC
/// 959 section 4.1.3. Takes no argument; a 32-hex-char token is the whole name. The reply echoes
/// the chosen name on `250`, as most servers do instead of the RFC's bare mention of it in the
/// `226` text.
#[derive(Debug, Default)]
pub struct Stou;

#[async_trait]
impl CommandHandler for Stou {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let vfs = ctx.session.vfs().expect("needs_auth guarantees a vfs");
        let name = uuid::Uuid::new_v4().simple().to_string();
        let path = ctx.session.resolve(&name);

        let (stream, transfer_ctx) = match super::transfer::open(ctx, &format!("Opening data connection for {}", path)).await {
            Ok(x) => x,
            Err(r) => return r,
        };
        let result = vfs.create(&transfer_ctx, &path, Box::pin(stream)).await;
        super::transfer::finish(ctx);
        match result {
            Ok(()) => Reply::new(ReplyCode::ClosingDataConnection, format!("Transfer complete, stored as {}", quote_path(&path))),
            Err(e) => super::transfer::vfs_error_reply(e),
        }
    }
}

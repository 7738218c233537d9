use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::quote_path;
use async_trait::async_trait;

/// `PWD`: reports the present working directory, quoted per RFC 959.
#[derive(Debug, Default)]
pub struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::DirCreated, format!("{} is the current directory", quote_path(&ctx.session.pwd)))
    }
}

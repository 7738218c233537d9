use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `USER <name>`: stage the username, wait for `PASS`.
#[derive(Debug, Default)]
pub struct User;

#[async_trait]
impl CommandHandler for User {
    fn needs_param(&self) -> bool {
        true
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        ctx.session.user = Some(ctx.arg.to_string());
        ctx.session.vfs = None;
        Reply::new(ReplyCode::NeedPassword, "Please specify the password")
    }
}

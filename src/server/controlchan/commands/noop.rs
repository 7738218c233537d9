use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `NOOP`: does nothing, replies `200`.
#[derive(Debug, Default)]
pub struct Noop;

#[async_trait]
impl CommandHandler for Noop {
    fn needs_param(&self) -> bool {
        false
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::CommandOkay, "")
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `HELP`: a static, human-oriented message.
#[derive(Debug, Default)]
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::HelpMessage, "Help: see RFC 959, 2228, 2389, 2428, 3659")
    }
}

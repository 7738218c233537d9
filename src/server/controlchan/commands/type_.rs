use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `TYPE <code>`: accepted for any code, since stream-mode transfers are 8-bit regardless of
/// ASCII/binary framing.
#[derive(Debug, Default)]
pub struct Type;

#[async_trait]
impl CommandHandler for Type {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::CommandOkay, "Type set successfully")
    }
}

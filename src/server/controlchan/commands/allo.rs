use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `ALLO`: storage pre-allocation, accepted and ignored (object stores have no such concept).
#[derive(Debug, Default)]
pub struct Allo;

#[async_trait]
impl CommandHandler for Allo {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::CommandOkayNotImplemented, "ALLO command not necessary")
    }
}

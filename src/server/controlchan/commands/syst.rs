use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `SYST`: reports a UNIX-like system type, which is all the VFS abstraction resembles.
#[derive(Debug, Default)]
pub struct Syst;

#[async_trait]
impl CommandHandler for Syst {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::SystemType, "UNIX Type: L8")
    }
}

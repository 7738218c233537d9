use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `ACCT <info>`: obsolete account-information command, accepted and ignored.
#[derive(Debug, Default)]
pub struct Acct;

#[async_trait]
impl CommandHandler for Acct {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new(ReplyCode::CommandOkayNotImplemented, "ACCT command not implemented, superfluous at this site")
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `QUIT`: close the control connection after a final reply.
#[derive(Debug, Default)]
pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    fn needs_param(&self) -> bool {
        false
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        ctx.session.quit = true;
        Reply::new(ReplyCode::ClosingControlConnection, "Goodbye")
    }
}

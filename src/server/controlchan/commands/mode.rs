use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `MODE <code>`: only Stream mode (`S`) is supported.
#[derive(Debug, Default)]
pub struct Mode;

#[async_trait]
impl CommandHandler for Mode {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if ctx.arg.eq_ignore_ascii_case("S") {
            Reply::new(ReplyCode::CommandOkay, "Mode set to S")
        } else {
            Reply::new(ReplyCode::CommandNotImplementedForParameter, "Only S(tream) mode is supported")
        }
    }
}

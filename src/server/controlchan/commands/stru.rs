use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `STRU <code>`: only File structure (`F`) is supported.
#[derive(Debug, Default)]
pub struct Stru;

#[async_trait]
impl CommandHandler for Stru {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if ctx.arg.eq_ignore_ascii_case("F") {
            Reply::new(ReplyCode::CommandOkay, "Structure set to F")
        } else {
            Reply::new(ReplyCode::CommandNotImplementedForParameter, "Only F(ile) structure is supported")
        }
    }
}

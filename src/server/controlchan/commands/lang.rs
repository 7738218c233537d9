use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `LANG <tag>`: only `en` (or no argument, meaning "default") is accepted.
#[derive(Debug, Default)]
pub struct Lang;

#[async_trait]
impl CommandHandler for Lang {
    fn needs_param(&self) -> bool {
        false
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if ctx.arg.is_empty() || ctx.arg.eq_ignore_ascii_case("en") {
            Reply::new(ReplyCode::CommandOkay, "Language set to en")
        } else {
            Reply::new(ReplyCode::CommandNotImplementedForParameter, "Unsupported language")
        }
    }
}

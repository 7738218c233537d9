use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `OPTS <option> [value]`: accepts the options this crate actually understands, `501` otherwise.
#[derive(Debug, Default)]
pub struct Opts;

#[async_trait]
impl CommandHandler for Opts {
    fn needs_param(&self) -> bool {
        true
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let option = ctx.arg.split_whitespace().next().unwrap_or("").to_ascii_uppercase();
        match option.as_str() {
            "UTF8" => Reply::new(ReplyCode::CommandOkay, "Always in UTF8 mode"),
            _ => Reply::new(ReplyCode::ParameterSyntaxError, "Option not understood"),
        }
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `PBSZ <size>`: accepted only as `0`, and only once the control channel is under TLS.
#[derive(Debug, Default)]
pub struct Pbsz;

#[async_trait]
impl CommandHandler for Pbsz {
    fn needs_param(&self) -> bool {
        true
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if !ctx.session.control_tls {
            return Reply::new(ReplyCode::BadCommandSequence, "PBSZ requires an active TLS session");
        }
        if ctx.arg.trim() != "0" {
            return Reply::new(ReplyCode::ParameterSyntaxError, "Only PBSZ 0 is supported");
        }
        ctx.session.pbsz_seen = true;
        Reply::new(ReplyCode::CommandOkay, "PBSZ set to 0")
    }
}

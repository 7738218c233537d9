use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `AUTH TLS`: requests an explicit TLS upgrade of the control channel, per RFC 4217. The actual
/// handshake happens in the control loop after this reply is flushed.
#[derive(Debug, Default)]
pub struct Auth;

#[async_trait]
impl CommandHandler for Auth {
    fn needs_param(&self) -> bool {
        true
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if !ctx.arg.eq_ignore_ascii_case("TLS") {
            return Reply::new(ReplyCode::CommandNotImplementedForParameter, "Unsupported security mechanism");
        }
        if ctx.config.ftps.is_none() {
            return Reply::new(ReplyCode::CommandNotImplemented, "TLS is not configured on this server");
        }
        ctx.session.request_tls_upgrade = true;
        Reply::new(ReplyCode::AuthOkayNoDataNeeded, "AUTH command ok. Expecting TLS Negotiation")
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `PROT <level>`: `C` (clear) is always accepted; `P` (private) requires a TLS control channel;
/// `S`/`E` are not supported.
#[derive(Debug, Default)]
pub struct Prot;

#[async_trait]
impl CommandHandler for Prot {
    fn needs_param(&self) -> bool {
        true
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        match ctx.arg.to_ascii_uppercase().as_str() {
            "C" => {
                ctx.session.protect_data = false;
                Reply::new(ReplyCode::CommandOkay, "Protection set to Clear")
            }
            "P" if ctx.session.control_tls => {
                ctx.session.protect_data = true;
                Reply::new(ReplyCode::CommandOkay, "Protection set to Private")
            }
            "P" => Reply::new(ReplyCode::FtpsRequired, "PROT P requires an active TLS session"),
            _ => Reply::new(ReplyCode::ProtNotSupported, "Only C and P are supported"),
        }
    }
}

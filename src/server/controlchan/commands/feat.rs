use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `FEAT`: advertises the RFC 2389/2428/2228/3659 extensions this crate implements.
#[derive(Debug, Default)]
pub struct Feat;

#[async_trait]
impl CommandHandler for Feat {
    fn needs_param(&self) -> bool {
        false
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Reply {
        Reply::new_multiline(ReplyCode::SystemStatus, ["Extensions supported:", "EPRT", "EPSV", "SIZE", "MDTM", "AUTH TLS", "PBSZ", "PROT", "End"])
    }
}

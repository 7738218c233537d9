use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::DataTransfer;
use async_trait::async_trait;

/// `EPSV`/`EPSV ALL` (RFC 2428): protocol-agnostic passive mode. `EPSV ALL` latches the session
/// into passive-only operation: any subsequent `PORT`/`EPRT`/`PASV` is refused.
#[derive(Debug, Default)]
pub struct Epsv;

#[async_trait]
impl CommandHandler for Epsv {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if ctx.arg.eq_ignore_ascii_case("ALL") {
            ctx.session.epsv_all = true;
            return Reply::new(ReplyCode::CommandOkay, "EPSV ALL ok");
        }
        let peer_ip = ctx.config.enable_address_check.then_some(ctx.session.peer_addr.ip());
        let tls = ctx.session.protect_data.then(|| ctx.config.ftps.clone()).flatten();
        let mut guard = ctx.session.data_transfer.lock().await;
        guard.close(&ctx.config.port_pool);
        match DataTransfer::passive(ctx.config.port_pool.clone(), ctx.config.passive_host, peer_ip, tls).await {
            Ok(dt) => {
                let port = dt.passive_port().expect("just created passive");
                *guard = dt;
                Reply::new(ReplyCode::EnteringExtendedPassiveMode, format!("Entering Extended Passive Mode (|||{}|)", port))
            }
            Err(e) => super::transfer::data_chan_error_reply(e),
        }
    }
}

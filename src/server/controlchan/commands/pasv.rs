use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::DataTransfer;
use async_trait::async_trait;
use std::net::IpAddr;

/// `PASV`: opens a listening data port and reports it in the legacy, IPv4-only `h1,h2,h3,h4,p1,p2`
/// form. Refused once `EPSV ALL` has been seen, and when the configured passive host isn't IPv4.
#[derive(Debug, Default)]
pub struct Pasv;

#[async_trait]
impl CommandHandler for Pasv {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if ctx.session.epsv_all {
            return Reply::new(ReplyCode::BadCommandSequence, "EPSV ALL in effect, use EPSV");
        }
        let IpAddr::V4(host) = ctx.config.passive_host else {
            return Reply::new(ReplyCode::CommandNotImplemented, "PASV unavailable, use EPSV");
        };
        let peer_ip = ctx.config.enable_address_check.then_some(ctx.session.peer_addr.ip());
        let tls = ctx.session.protect_data.then(|| ctx.config.ftps.clone()).flatten();
        let mut guard = ctx.session.data_transfer.lock().await;
        guard.close(&ctx.config.port_pool);
        match DataTransfer::passive(ctx.config.port_pool.clone(), ctx.config.passive_host, peer_ip, tls).await {
            Ok(dt) => {
                let port = dt.passive_port().expect("just created passive");
                *guard = dt;
                let octets = host.octets();
                Reply::new(
                    ReplyCode::EnteringPassiveMode,
                    format!(
                        "Entering Passive Mode ({},{},{},{},{},{})",
                        octets[0],
                        octets[1],
                        octets[2],
                        octets[3],
                        port >> 8,
                        port & 0xff
                    ),
                )
            }
            Err(e) => super::transfer::data_chan_error_reply(e),
        }
    }
}

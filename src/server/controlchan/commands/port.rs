use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::DataTransfer;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn parse_port_arg(arg: &str) -> Option<SocketAddr> {
    let parts: Vec<&str> = arg.trim().split(',').collect();
    if parts.len() != 6 {
        return None;
    }
    let mut n = [0u8; 6];
    for (i, p) in parts.iter().enumerate() {
        n[i] = p.parse().ok()?;
    }
    let ip = Ipv4Addr::new(n[0], n[1], n[2], n[3]);
    let port = (u16::from(n[4]) << 8) | u16::from(n[5]);
    Some(SocketAddr::new(IpAddr::V4(ip), port))
}

/// `EPRT`'s `|net-prtcl|net-addr|tcp-port|` wire form, shared with [`parse_eprt_arg`].
fn parse_eprt_arg(arg: &str) -> Option<SocketAddr> {
    let arg = arg.trim();
    let delim = arg.chars().next()?;
    let parts: Vec<&str> = arg.trim_matches(delim).split(delim).collect();
    if parts.len() != 3 {
        return None;
    }
    let ip: IpAddr = parts[1].parse().ok()?;
    let port: u16 = parts[2].parse().ok()?;
    Some(SocketAddr::new(ip, port))
}

async fn do_active(ctx: &mut CommandContext<'_>, addr: SocketAddr) -> Reply {
    if !ctx.config.enable_active_mode {
        return Reply::new(ReplyCode::CommandNotImplemented, "Active mode is disabled");
    }
    if ctx.session.epsv_all {
        return Reply::new(ReplyCode::BadCommandSequence, "EPSV ALL in effect");
    }
    let peer_ip = ctx.config.enable_address_check.then_some(ctx.session.peer_addr.ip());
    let tls = ctx.session.protect_data.then(|| ctx.config.ftps.clone()).flatten();
    let mut guard = ctx.session.data_transfer.lock().await;
    guard.close(&ctx.config.port_pool);
    match DataTransfer::active(peer_ip, addr, tls.as_ref()).await {
        Ok(dt) => {
            *guard = dt;
            Reply::new(ReplyCode::CommandOkay, "PORT command successful")
        }
        Err(e) => super::transfer::data_chan_error_reply(e),
    }
}

/// `PORT h1,h2,h3,h4,p1,p2`: IPv4-only active mode, per RFC 959.
#[derive(Debug, Default)]
pub struct Port;

#[async_trait]
impl CommandHandler for Port {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        match parse_port_arg(ctx.arg) {
            Some(addr) => do_active(ctx, addr).await,
            None => Reply::new(ReplyCode::ParameterSyntaxError, "Malformed PORT argument"),
        }
    }
}

/// `EPRT |proto|addr|port|` (RFC 2428): protocol-agnostic active mode.
#[derive(Debug, Default)]
pub struct Eprt;

#[async_trait]
impl CommandHandler for Eprt {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        match parse_eprt_arg(ctx.arg) {
            Some(addr) => do_active(ctx, addr).await,
            None => Reply::new(ReplyCode::ParameterSyntaxError, "Malformed EPRT argument"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_port_argument() {
        let addr = parse_port_arg("192,168,1,2,7,197").unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2)), 2000));
    }

    #[test]
    fn parses_eprt_ipv4_argument() {
        let addr = parse_eprt_arg("|1|132.235.1.2|6275|").unwrap();
        assert_eq!(addr, SocketAddr::new("132.235.1.2".parse().unwrap(), 6275));
    }

    #[test]
    fn parses_eprt_ipv6_argument() {
        let addr = parse_eprt_arg("|2|::1|6275|").unwrap();
        assert_eq!(addr, SocketAddr::new("::1".parse().unwrap(), 6275));
    }

    #[test]
    fn rejects_malformed_port_argument() {
        assert!(parse_port_arg("1,2,3").is_none());
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// `MDTM <path>`: last-modified time as `YYYYMMDDhhmmss` UTC, per RFC 3659.
#[derive(Debug, Default)]
pub struct Mdtm;

#[async_trait]
impl CommandHandler for Mdtm {
    fn needs_param(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let target = ctx.session.resolve(ctx.arg);
        let Some(vfs) = ctx.session.vfs() else {
            return Reply::new(ReplyCode::NotLoggedIn, "Please login first");
        };
        match vfs.stat(&ctx.session.ctx, &target).await {
            Ok(info) => {
                let t: DateTime<Utc> = info.mod_time.unwrap_or(SystemTime::UNIX_EPOCH).into();
                Reply::new(ReplyCode::FileStatus, t.format("%Y%m%d%H%M%S").to_string())
            }
            Err(_) => Reply::new(ReplyCode::FileError, "Could not get modification time"),
        }
    }
}

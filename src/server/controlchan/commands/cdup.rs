use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::normalize;
use async_trait::async_trait;

/// `CDUP`: equivalent to `CWD ..`; a no-op failure at the root.
#[derive(Debug, Default)]
pub struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if ctx.session.pwd == "/" {
            return Reply::new(ReplyCode::FileError, "Already at the root directory");
        }
        ctx.session.pwd = normalize(&format!("{}/..", ctx.session.pwd));
        Reply::new(ReplyCode::FileActionOkay, "Directory successfully changed")
    }
}

use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `PASS <password>`: authorize the staged `USER`. Failures are throttled with an exponential
/// backoff sleep before the `530` is sent, applied uniformly regardless of whether the username
/// was unknown or the password was wrong.
#[derive(Debug, Default)]
pub struct Pass;

#[async_trait]
impl CommandHandler for Pass {
    fn needs_param(&self) -> bool {
        false
    }

    fn needs_auth(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        let Some(username) = ctx.session.user.clone() else {
            return Reply::new(ReplyCode::BadCommandSequence, "Please specify a username first with USER");
        };

        match ctx.config.authenticator.authorize(&username, ctx.arg).await {
            Ok(auth) => {
                ctx.session.auth_failures = 0;
                ctx.session.user = Some(auth.user);
                ctx.session.vfs = Some(auth.vfs);
                Reply::new(ReplyCode::UserLoggedIn, "Login successful")
            }
            Err(_) => {
                ctx.session.auth_failures += 1;
                let delay = ctx.session.auth_throttle_delay();
                tokio::time::sleep(delay).await;
                Reply::new(ReplyCode::NotLoggedIn, "Login incorrect")
            }
        }
    }
}

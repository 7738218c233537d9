use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use async_trait::async_trait;

/// `ABOR`: cancels whatever transfer context a data-transfer command stashed (if any), then tears
/// down the data channel. Always replies `226`, whether or not a transfer was actually running.
#[derive(Debug, Default)]
pub struct Abor;

#[async_trait]
impl CommandHandler for Abor {
    fn needs_param(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply {
        if let Some(transfer_ctx) = ctx.session.transfer_ctx.lock().expect("transfer_ctx mutex poisoned").clone() {
            transfer_ctx.cancel();
        }
        ctx.session.data_transfer.lock().await.close(&ctx.config.port_pool);
        Reply::new(ReplyCode::ClosingDataConnection, "Abort successful")
    }
}

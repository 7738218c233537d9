//! The common interface implemented by every command in `commands/`.

use super::reply::Reply;
use crate::server::session::{Session, SessionConfig};
use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

/// One handler per FTP verb. `needs_param`/`needs_auth` are checked by the control loop before
/// `execute` runs, so implementations can assume those preconditions hold.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Whether a non-empty argument is required; violations reply `501` without calling `execute`.
    fn needs_param(&self) -> bool {
        false
    }

    /// Whether the session must already be authorized; violations reply `530` without calling
    /// `execute`.
    fn needs_auth(&self) -> bool {
        true
    }

    /// Runs the command. Returning [`Reply::None`] means the handler already sent its own reply
    /// via `ctx.async_replies` instead of (or in addition to) its return value.
    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Reply;
}

/// Everything a [`CommandHandler`] needs: the session it's mutating, the command's argument, and
/// the listener-wide configuration it was accepted under.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub arg: &'a str,
    pub config: &'a SessionConfig,
    /// Channel a handler can use to send a provisional reply (e.g. the `150` before a transfer)
    /// while `execute` is still running. The control loop drains this concurrently with `execute`,
    /// so a send here reaches the wire before `execute`'s own return value does.
    pub async_replies: Sender<Reply>,
}

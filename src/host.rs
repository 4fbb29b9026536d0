//! Host boundary — the outgoing-message event the core consumes.

use async_trait::async_trait;

use crate::error::HostError;
use crate::segment::MessageChain;

/// One outgoing-message event, as presented by the bot framework.
///
/// Pure boundary, no business logic: the core reads the composed reply and
/// its context through this trait and asks the host to substitute or
/// withhold delivery. The host keeps ownership of the actual send.
#[async_trait]
pub trait OutboundEvent: Send + Sync {
    /// The reply chain composed upstream, about to be delivered.
    fn outgoing_chain(&self) -> MessageChain;

    /// Owning group id; `None` for private conversations.
    fn group_id(&self) -> Option<String>;

    /// Whether the sender of the triggering message is a bot administrator.
    fn is_sender_admin(&self) -> bool;

    /// Raw text of the inbound message that triggered this reply.
    fn message_text(&self) -> &str;

    /// Sender identifier of the triggering inbound message.
    fn sender_id(&self) -> &str;

    /// Platform identifier (e.g. "aiocqhttp", "telegram").
    fn platform(&self) -> &str;

    /// Substitute the outgoing result with a different chain.
    async fn replace_result(&self, chain: MessageChain) -> Result<(), HostError>;

    /// Withhold delivery of the outgoing result entirely.
    async fn suppress_delivery(&self);
}

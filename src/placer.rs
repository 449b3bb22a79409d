use std::sync::Arc;
use tracing::{debug, error};

use crate::client::ReactionClient;
use crate::error::ClientError;
use crate::flood::FloodControl;
use crate::types::MessageId;

/// Applies a reaction set, waiting out rate limits for as long as the platform asks.
pub struct ReactionPlacer<C: ReactionClient> {
    client: Arc<C>,
    flood: FloodControl,
}

impl<C: ReactionClient> ReactionPlacer<C> {
    pub fn new(client: Arc<C>, flood: FloodControl) -> Self {
        Self { client, flood }
    }

    /// Every error returned here is terminal for this attempt.
    pub async fn place(
        &self,
        peer: &C::Peer,
        message_id: MessageId,
        emoticons: &[String],
    ) -> Result<(), ClientError> {
        loop {
            match self.client.set_reaction(peer, message_id, emoticons).await {
                Ok(()) => return Ok(()),
                Err(ClientError::RateLimited(wait)) => {
                    self.flood.wait_out(wait, "reaction").await;
                }
                Err(ClientError::ReactionInvalid) => {
                    error!(
                        "Reactions {} were not sent! Some of these reactions are invalid in this chat.",
                        emoticons.join(", ")
                    );
                    return Err(ClientError::ReactionInvalid);
                }
                Err(ClientError::NotModified) => {
                    error!("Message was not modified. The modification is outdated.");
                    return Err(ClientError::NotModified);
                }
                Err(ClientError::MessageGone) => {
                    debug!("Message {} is no longer addressable", message_id);
                    return Err(ClientError::MessageGone);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

//! Outbound message delivery seam.

use std::sync::Mutex;

use async_trait::async_trait;

/// Channel that delivers the router's single response message.
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    /// Deliver `text` to `recipient` on behalf of the organization.
    ///
    /// # Errors
    ///
    /// Returns a channel-specific message on delivery failure.
    async fn send(
        &self,
        organization_id: &str,
        recipient: &str,
        text: &str,
    ) -> Result<(), String>;
}

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub organization_id: String,
    pub recipient: String,
    pub text: String,
}

/// Capturing channel for tests and demos.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl OutboundChannel for RecordingChannel {
    async fn send(
        &self,
        organization_id: &str,
        recipient: &str,
        text: &str,
    ) -> Result<(), String> {
        self.sent
            .lock()
            .map_err(|_| "channel lock poisoned".to_string())?
            .push(SentMessage {
                organization_id: organization_id.to_string(),
                recipient: recipient.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }
}

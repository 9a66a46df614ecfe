//! Channel-backed text sink

use crate::error::ApiError;
use std::sync::mpsc::Sender;
use tokflow_core::{BoxError, TextSink};

/// Forwards non-empty deltas into an `mpsc` channel
///
/// The sender is dropped on the final notification, which closes the
/// channel for the receiving side.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Option<Sender<String>>,
}

impl ChannelSink {
    pub fn new(sender: Sender<String>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Whether the final notification has been seen
    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }
}

impl TextSink for ChannelSink {
    fn notify(&mut self, delta: &str, is_final: bool) -> Result<(), BoxError> {
        if !delta.is_empty() {
            let sender = self.sender.as_ref().ok_or(ApiError::ChannelClosed)?;
            sender
                .send(delta.to_owned())
                .map_err(|_| ApiError::ReceiverDropped)?;
        }
        if is_final {
            self.sender = None;
        }
        Ok(())
    }
}

//! Multi-frame message animations.
//!
//! An animation sends its first frame as a new message and then edits that
//! message through the remaining frames, sleeping before each one. Sleeping
//! yields to the runtime, so a playing animation never holds up other
//! commands.

pub mod effects;

use chat_gateway::{ChannelId, ChatGateway, GatewayError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One frame and the delay before it is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub delay: Duration,
    pub text: String,
}

/// An ordered sequence of frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<Frame>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame shown `delay` after the previous one.
    pub fn frame(mut self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(delay, text);
        self
    }

    pub fn push(&mut self, delay: Duration, text: impl Into<String>) {
        self.frames.push(Frame {
            delay,
            text: text.into(),
        });
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total time from the first frame to the last.
    pub fn duration(&self) -> Duration {
        self.frames.iter().map(|f| f.delay).sum()
    }

    /// Play the animation to completion in `channel`.
    ///
    /// Returns the number of frames shown. The first failed send or edit
    /// stops the sequence; nothing is retried.
    pub async fn play(
        &self,
        gateway: &dyn ChatGateway,
        channel: ChannelId,
    ) -> Result<usize, GatewayError> {
        let mut frames = self.frames.iter();
        let Some(first) = frames.next() else {
            return Ok(0);
        };

        pause(first.delay).await;
        let mut message = gateway.send(channel, &first.text).await?;
        let mut shown = 1;

        for frame in frames {
            pause(frame.delay).await;
            message = gateway.edit(&message, &frame.text).await?;
            shown += 1;
        }

        Ok(shown)
    }

    /// Play the animation as an independent task.
    pub fn spawn(self, gateway: Arc<dyn ChatGateway>, channel: ChannelId) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self.play(gateway.as_ref(), channel).await {
                Ok(shown) => debug!("Animation finished in {} ({} frames)", channel, shown),
                Err(e) => warn!("Animation in {} stopped: {}", channel, e),
            }
        })
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

//! Main event loop and connection lifecycle.

use crate::dispatcher::{Dispatcher, Outcome};
use chat_gateway::{ChatGateway, GatewayError, InboundEvent, UserRef};
use std::future::Future;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info};

/// Connects gateway events to the dispatcher.
pub struct Manager {
    gateway: Arc<dyn ChatGateway>,
    dispatcher: Dispatcher,
    /// Set once the session is ready. Messages before that are dropped.
    user: Option<UserRef>,
    fake_connect: bool,
}

impl Manager {
    pub fn new(gateway: Arc<dyn ChatGateway>, dispatcher: Dispatcher, fake_connect: bool) -> Self {
        Self {
            gateway,
            dispatcher,
            user: None,
            fake_connect,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// The bot's own account, once logged in.
    pub fn user(&self) -> Option<&UserRef> {
        self.user.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one gateway event. Returns the outcome for chat messages that
    /// reached the dispatcher.
    pub async fn handle_event(&mut self, event: InboundEvent) -> Option<Outcome> {
        match event {
            InboundEvent::Ready { user } => {
                info!("Discord: logged in as {} ({})", user.name, user.id);
                self.user = Some(user);
                None
            }
            InboundEvent::Message(message) => {
                let Some(me) = &self.user else {
                    debug!("Discord: dropping message received before login");
                    return None;
                };
                if message.author.id == me.id {
                    return None;
                }
                Some(self.dispatcher.handle(&message).await)
            }
        }
    }

    /// Process `events` until the stream ends or `shutdown` resolves.
    ///
    /// Returns the shutdown value, or `None` if the stream ended first.
    pub async fn run<S, F>(&mut self, events: S, shutdown: F) -> Option<F::Output>
    where
        S: Stream<Item = InboundEvent> + Unpin,
        F: Future,
    {
        let mut events = events;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(event) => {
                        self.handle_event(event).await;
                    }
                    None => {
                        info!("Discord: event stream closed");
                        return None;
                    }
                },
                reason = &mut shutdown => return Some(reason),
            }
        }
    }

    /// Close the gateway connection. Errors are logged, never returned.
    pub async fn disconnect(&self) {
        if self.fake_connect {
            debug!("Discord: fake connection, nothing to close");
            return;
        }

        match self.gateway.disconnect().await {
            Ok(()) => info!("Discord: disconnected"),
            Err(GatewayError::NotConnected) => debug!("Discord: already disconnected"),
            Err(e) => error!("Discord: error when disconnecting: {}", e),
        }
    }
}

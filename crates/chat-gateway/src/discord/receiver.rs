//! Shard event receiver.

use crate::types::*;
use tokio_stream::Stream;
use tracing::{debug, info, trace, warn};
use twilight_gateway::{Event, EventTypeFlags, Shard, StreamExt as _};
use twilight_model::channel::Message;

/// Turns shard events into [`InboundEvent`]s.
pub struct EventReceiver {
    shard: Shard,
}

impl EventReceiver {
    pub fn new(shard: Shard) -> Self {
        Self { shard }
    }

    /// Receive events as an async stream.
    ///
    /// The stream ends when the shard is closed.
    pub fn stream(mut self) -> impl Stream<Item = InboundEvent> {
        async_stream::stream! {
            let flags = EventTypeFlags::READY | EventTypeFlags::MESSAGE_CREATE;
            let shard_id = self.shard.id().number();

            while let Some(item) = self.shard.next_event(flags).await {
                match item {
                    Ok(Event::Ready(ready)) => {
                        info!("Discord: shard {} ready as {}", shard_id, ready.user.name);
                        yield InboundEvent::Ready {
                            user: UserRef {
                                id: UserId(ready.user.id.get()),
                                name: ready.user.name.clone(),
                                bot: ready.user.bot,
                            },
                        };
                    }
                    Ok(Event::MessageCreate(create)) => {
                        let message = inbound_message(&create);
                        debug!(
                            "Received: {} from {}",
                            &message.text.chars().take(50).collect::<String>(),
                            message.author.name
                        );
                        yield InboundEvent::Message(message);
                    }
                    Ok(event) => {
                        trace!("Discord: unhandled event {:?}", event.kind());
                    }
                    Err(e) => {
                        warn!("Discord: error receiving event: {}", e);
                    }
                }
            }

            info!("Discord: shard {} event stream ended", shard_id);
        }
    }
}

/// Convert a Discord message into an [`InboundMessage`].
pub fn inbound_message(message: &Message) -> InboundMessage {
    let channel = match message.guild_id {
        Some(guild) => ChannelRef::guild(
            ChannelId(message.channel_id.get()),
            GuildId(guild.get()),
            None,
        ),
        None => ChannelRef::private(ChannelId(message.channel_id.get())),
    };

    InboundMessage {
        channel,
        author: UserRef {
            id: UserId(message.author.id.get()),
            name: message.author.name.clone(),
            bot: message.author.bot,
        },
        text: message.content.clone(),
    }
}

//! Discord REST adapter.

use crate::discord::receiver::EventReceiver;
use crate::error::GatewayError;
use crate::types::*;
use crate::ChatGateway;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};
use twilight_gateway::{CloseFrame, Intents, MessageSender, Shard, ShardId};
use twilight_http::error::ErrorType;
use twilight_http::Client;
use twilight_model::channel::message::AllowedMentions;
use twilight_model::id::Id;

/// Intents needed to read guild and direct messages.
const INTENTS: Intents = Intents::GUILDS
    .union(Intents::GUILD_MESSAGES)
    .union(Intents::DIRECT_MESSAGES)
    .union(Intents::MESSAGE_CONTENT);

/// Discord implementation of [`ChatGateway`].
///
/// The token is stored using `SecretString` so it never shows up in
/// debug output.
#[derive(Clone)]
pub struct DiscordGateway {
    http: Arc<Client>,
    token: SecretString,
    shard_sender: Arc<Mutex<Option<MessageSender>>>,
}

impl DiscordGateway {
    /// Create a new gateway. No connection is made until [`connect`](Self::connect).
    pub fn new(token: SecretString) -> Self {
        let http = Client::new(token.expose_secret().clone());

        Self {
            http: Arc::new(http),
            token,
            shard_sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Open a single shard and return a receiver for its events.
    pub fn connect(&self) -> EventReceiver {
        let shard = Shard::new(ShardId::ONE, self.token.expose_secret().clone(), INTENTS);

        if let Ok(mut sender) = self.shard_sender.lock() {
            *sender = Some(shard.sender());
        }

        info!("Discord: shard {} connecting", shard.id().number());
        EventReceiver::new(shard)
    }

    /// Whether a shard is currently open.
    pub fn is_connected(&self) -> bool {
        self.shard_sender
            .lock()
            .map(|sender| sender.is_some())
            .unwrap_or(false)
    }
}

fn id<T>(raw: u64) -> Result<Id<T>, GatewayError> {
    Id::new_checked(raw).ok_or(GatewayError::InvalidId(raw))
}

/// Mentions the bot may ping: none. Echoed user input must not reach
/// `@everyone` or any role.
fn no_mentions() -> AllowedMentions {
    AllowedMentions::default()
}

fn is_not_found(error: &twilight_http::Error) -> bool {
    matches!(error.kind(), ErrorType::Response { status, .. } if status.get() == 404)
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    #[instrument(skip(self, text))]
    async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, GatewayError> {
        let mentions = no_mentions();
        let message = self
            .http
            .create_message(id(channel.0)?)
            .content(text)
            .allowed_mentions(Some(&mentions))
            .await?
            .model()
            .await?;

        debug!("Sent message {} to {}", message.id, channel);
        Ok(MessageHandle {
            channel_id: channel,
            id: MessageId(message.id.get()),
        })
    }

    #[instrument(skip(self, text))]
    async fn edit(
        &self,
        message: &MessageHandle,
        text: &str,
    ) -> Result<MessageHandle, GatewayError> {
        let mentions = no_mentions();
        let updated = self
            .http
            .update_message(id(message.channel_id.0)?, id(message.id.0)?)
            .content(Some(text))
            .allowed_mentions(Some(&mentions))
            .await?
            .model()
            .await?;

        Ok(MessageHandle {
            channel_id: ChannelId(updated.channel_id.get()),
            id: MessageId(updated.id.get()),
        })
    }

    #[instrument(skip(self))]
    async fn channel(&self, channel: ChannelId) -> Result<ChannelRef, GatewayError> {
        let info = match self.http.channel(id(channel.0)?).await {
            Ok(response) => response.model().await?,
            Err(e) if is_not_found(&e) => return Err(GatewayError::NotFound(channel.0)),
            Err(e) => return Err(e.into()),
        };

        Ok(ChannelRef {
            id: channel,
            guild_id: info.guild_id.map(|g| GuildId(g.get())),
            name: info.name,
        })
    }

    #[instrument(skip(self))]
    async fn guild_roles(&self, guild: GuildId) -> Result<Vec<RoleInfo>, GatewayError> {
        let roles = self.http.roles(id(guild.0)?).await?.models().await?;

        Ok(roles
            .into_iter()
            .map(|r| RoleInfo {
                id: RoleId(r.id.get()),
                name: r.name,
                position: r.position,
                permissions: r.permissions.bits(),
                managed: r.managed,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn member_role_ids(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<Vec<RoleId>, GatewayError> {
        let member = self
            .http
            .guild_member(id(guild.0)?, id(user.0)?)
            .await?
            .model()
            .await?;

        Ok(member.roles.iter().map(|r| RoleId(r.get())).collect())
    }

    async fn bot_role_ids(&self, guild: GuildId) -> Result<Vec<RoleId>, GatewayError> {
        let me = self.http.current_user().await?.model().await?;
        self.member_role_ids(guild, UserId(me.id.get())).await
    }

    #[instrument(skip(self))]
    async fn add_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), GatewayError> {
        self.http
            .add_guild_member_role(id(guild.0)?, id(user.0)?, id(role.0)?)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), GatewayError> {
        self.http
            .remove_guild_member_role(id(guild.0)?, id(user.0)?, id(role.0)?)
            .await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        let sender = self
            .shard_sender
            .lock()
            .map_err(|_| GatewayError::Gateway("shard sender lock poisoned".into()))?
            .take();

        match sender {
            Some(sender) => {
                sender
                    .close(CloseFrame::NORMAL)
                    .map_err(|e| GatewayError::Gateway(e.to_string()))?;
                info!("Discord: shard closed");
                Ok(())
            }
            None => {
                warn!("Discord: disconnect requested with no open shard");
                Err(GatewayError::NotConnected)
            }
        }
    }
}

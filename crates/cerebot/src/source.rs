//! Per-channel source context.

use chat_gateway::{ChannelRef, ChatGateway, GatewayError, MessageHandle, RoleInfo};
use std::sync::Arc;
use tracing::debug;

/// Name of the bot's own role; only roles below it can be self-assigned.
const BOT_ROLE_NAME: &str = "Bot";

/// How a chat message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    /// Emote-style, rendered in italics.
    Action,
    /// Preformatted, rendered in a code block.
    Block,
}

/// The bot's context for one chat channel.
///
/// Bundles the channel reference with reply routing through the gateway.
#[derive(Clone)]
pub struct ChannelSource {
    channel: ChannelRef,
    prefix: char,
    gateway: Arc<dyn ChatGateway>,
}

impl ChannelSource {
    pub fn new(channel: ChannelRef, prefix: char, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            channel,
            prefix,
            gateway,
        }
    }

    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    pub fn gateway(&self) -> &Arc<dyn ChatGateway> {
        &self.gateway
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn is_private(&self) -> bool {
        self.channel.is_private()
    }

    /// Source description for logs, e.g. `Discord:#crawl`.
    pub fn describe(&self) -> String {
        format!("Discord:{}", self.channel.display_name())
    }

    /// Send a message to this channel.
    pub async fn send_chat(
        &self,
        message: &str,
        kind: MessageKind,
    ) -> Result<MessageHandle, GatewayError> {
        let text = format_message(message, kind, self.prefix);
        self.gateway.send(self.channel.id, &text).await
    }

    /// Send a plain reply.
    pub async fn reply(&self, message: &str) -> Result<MessageHandle, GatewayError> {
        self.send_chat(message, MessageKind::Normal).await
    }

    /// Roles members may grant themselves in this channel's guild.
    ///
    /// These are the roles below the bot's own "Bot" role that carry exactly
    /// the `@everyone` permissions. Direct messages have none.
    pub async fn vanity_roles(&self) -> Result<Vec<RoleInfo>, GatewayError> {
        let Some(guild) = self.channel.guild_id else {
            return Ok(Vec::new());
        };

        let roles = self.gateway.guild_roles(guild).await?;
        let bot_roles = self.gateway.bot_role_ids(guild).await?;

        let Some(bot_role) = roles
            .iter()
            .find(|r| r.name == BOT_ROLE_NAME && bot_roles.contains(&r.id))
        else {
            debug!("{}: no {} role held by the bot", self.describe(), BOT_ROLE_NAME);
            return Ok(Vec::new());
        };

        let Some(everyone) = roles.iter().find(|r| r.is_everyone(guild)) else {
            return Ok(Vec::new());
        };

        Ok(roles
            .iter()
            .filter(|r| {
                r.position < bot_role.position
                    && !r.is_everyone(guild)
                    && !r.managed
                    && r.permissions == everyone.permissions
            })
            .cloned()
            .collect())
    }
}

/// Apply presentation and escaping to outgoing text.
///
/// Normal messages starting with the command prefix get a leading `]` so
/// they never read as commands.
pub fn format_message(message: &str, kind: MessageKind, prefix: char) -> String {
    match kind {
        MessageKind::Action => format!("_{}_", message),
        MessageKind::Block => format!("```{}```", message),
        MessageKind::Normal if message.starts_with(prefix) => format!("]{}", message),
        MessageKind::Normal => message.to_string(),
    }
}

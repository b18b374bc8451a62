//! Chat gateway capability and its Discord adapter.
//!
//! Everything above this crate talks to the chat platform through the
//! [`ChatGateway`] trait; [`discord::DiscordGateway`] is the production
//! implementation.

pub mod discord;
mod error;
mod types;

pub use error::GatewayError;
pub use types::*;

use async_trait::async_trait;

/// Outbound operations consumed by the bot.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send a new message to a channel.
    async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, GatewayError>;

    /// Replace the content of a previously sent message.
    async fn edit(&self, message: &MessageHandle, text: &str)
        -> Result<MessageHandle, GatewayError>;

    /// Look up a channel's guild and name.
    async fn channel(&self, channel: ChannelId) -> Result<ChannelRef, GatewayError>;

    /// All roles of a guild.
    async fn guild_roles(&self, guild: GuildId) -> Result<Vec<RoleInfo>, GatewayError>;

    /// Roles held by a guild member.
    async fn member_role_ids(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<Vec<RoleId>, GatewayError>;

    /// Roles held by the bot's own account in a guild.
    async fn bot_role_ids(&self, guild: GuildId) -> Result<Vec<RoleId>, GatewayError>;

    async fn add_role(&self, guild: GuildId, user: UserId, role: RoleId)
        -> Result<(), GatewayError>;

    async fn remove_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), GatewayError>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<(), GatewayError>;
}

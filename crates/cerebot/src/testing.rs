//! Test doubles shared by unit tests.

use async_trait::async_trait;
use chat_gateway::*;
use mockall::mock;

mock! {
    pub Gateway {}

    #[async_trait]
    impl ChatGateway for Gateway {
        async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, GatewayError>;
        async fn edit(&self, message: &MessageHandle, text: &str) -> Result<MessageHandle, GatewayError>;
        async fn channel(&self, channel: ChannelId) -> Result<ChannelRef, GatewayError>;
        async fn guild_roles(&self, guild: GuildId) -> Result<Vec<RoleInfo>, GatewayError>;
        async fn member_role_ids(&self, guild: GuildId, user: UserId) -> Result<Vec<RoleId>, GatewayError>;
        async fn bot_role_ids(&self, guild: GuildId) -> Result<Vec<RoleId>, GatewayError>;
        async fn add_role(&self, guild: GuildId, user: UserId, role: RoleId) -> Result<(), GatewayError>;
        async fn remove_role(&self, guild: GuildId, user: UserId, role: RoleId) -> Result<(), GatewayError>;
        async fn disconnect(&self) -> Result<(), GatewayError>;
    }
}

/// Handle for a message the mock "sent".
pub fn handle(channel: ChannelId, id: u64) -> MessageHandle {
    MessageHandle {
        channel_id: channel,
        id: MessageId(id),
    }
}

use super::{Arguments, CommandContext, CommandHandler};
use crate::error::{CommandError, CommandResult};
use crate::source::{format_message, MessageKind};
use anyhow::Context;
use async_trait::async_trait;
use chat_gateway::{ChannelId, GatewayError, GuildId};
use tracing::info;

/// Relays a message into a channel of a given guild.
pub struct SayHandler;

fn snowflake(value: &str, what: &str) -> Result<u64, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::user(format!("Invalid {} id: {}", what, value)))
}

#[async_trait]
impl CommandHandler for SayHandler {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &Arguments) -> CommandResult {
        let guild = GuildId(snowflake(args.required(0)?, "server")?);
        let channel = ChannelId(snowflake(args.required(1)?, "channel")?);
        let message = args.required(2)?;
        let gateway = ctx.source.gateway();

        let target = match gateway.channel(channel).await {
            Ok(target) => target,
            Err(GatewayError::NotFound(_)) | Err(GatewayError::InvalidId(_)) => {
                return Err(CommandError::user(format!("Unknown channel: {}", channel)));
            }
            Err(e) => return Err(e.into()),
        };

        if target.guild_id != Some(guild) {
            return Err(CommandError::user(format!(
                "Channel {} is not in server {}",
                channel, guild
            )));
        }

        let text = format_message(message, MessageKind::Normal, ctx.source.prefix());
        gateway
            .send(target.id, &text)
            .await
            .with_context(|| format!("relaying message to {}", target.display_name()))?;

        info!(
            "{}: {} relayed a message to {}",
            ctx.source.describe(),
            ctx.caller.name,
            target.display_name()
        );
        Ok(())
    }
}

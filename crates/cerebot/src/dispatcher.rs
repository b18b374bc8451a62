//! Routes inbound chat lines to command handlers.

use crate::access::AccessList;
use crate::commands::{parse, CommandContext, CommandTable, Parsed};
use crate::config::DiscordConfig;
use crate::error::CommandError;
use crate::permission::{self, Permission};
use crate::ratelimit::RateLimiter;
use crate::source::ChannelSource;
use chat_gateway::{ChannelId, ChannelRef, ChatGateway, InboundMessage};
use source_cache::SourceCache;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

pub const RATE_LIMITED: &str = "Command limit reached, please try again later.";
pub const GENERIC_FAULT: &str = "Sorry, something went wrong.";

/// How a single inbound message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not a command.
    Chat,
    SyntaxError,
    Denied,
    Ignored,
    Throttled,
    Completed,
    UserError,
    Fault,
}

/// Owns the per-channel sources and the rate limit, and runs commands.
pub struct Dispatcher {
    gateway: Arc<dyn ChatGateway>,
    table: CommandTable,
    access: Arc<AccessList>,
    limiter: RateLimiter,
    sources: SourceCache<ChannelId, ChannelSource>,
    prefix: char,
}

impl Dispatcher {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        table: CommandTable,
        access: Arc<AccessList>,
        config: &DiscordConfig,
    ) -> Self {
        Self {
            gateway,
            table,
            access,
            limiter: RateLimiter::new(config.command_period, config.command_limit),
            sources: SourceCache::new(config.source_idle_timeout),
            prefix: config.command_prefix,
        }
    }

    /// Number of channel sources currently cached.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn has_source(&self, channel: ChannelId) -> bool {
        self.sources.contains(&channel)
    }

    /// Handle one chat message. Never fails; every error ends up either
    /// in a reply or in the log.
    pub async fn handle(&mut self, message: &InboundMessage) -> Outcome {
        let source = self.resolve_source(&message.channel).await;
        let caller = &message.author;

        let (command, args) = match parse(&self.table, self.prefix, &message.text) {
            Ok(Parsed::Chat) => return Outcome::Chat,
            Ok(Parsed::Command { command, args }) => (command, args),
            Err(e) => {
                if self.access.is_ignored(caller) {
                    return Outcome::Ignored;
                }
                debug!("{}: syntax error from {}: {}", source.describe(), caller.name, e);
                reply(&source, &e.to_string()).await;
                return Outcome::SyntaxError;
            }
        };

        match permission::check(&self.access, caller, command, source.channel()) {
            Permission::Allowed => {}
            Permission::Ignored => {
                debug!("{}: ignoring {} from {}", source.describe(), command.name, caller.name);
                return Outcome::Ignored;
            }
            Permission::Denied(reason) => {
                debug!(
                    "{}: denied {} to {}: {}",
                    source.describe(),
                    command.name,
                    caller.name,
                    reason
                );
                reply(&source, reason).await;
                return Outcome::Denied;
            }
        }

        if command.logged {
            if !self.limiter.try_acquire(Instant::now()) {
                info!(
                    "{}: command limit reached, refusing {} from {}",
                    source.describe(),
                    command.name,
                    caller.name
                );
                reply(&source, RATE_LIMITED).await;
                return Outcome::Throttled;
            }
            info!("{}: {} ran {}", source.describe(), caller.name, command.name);
        }

        let ctx = CommandContext {
            source: &source,
            caller,
            access: &self.access,
            table: &self.table,
        };

        match command.handler.execute(&ctx, &args).await {
            Ok(()) => Outcome::Completed,
            Err(CommandError::User(msg)) => {
                debug!("{}: {} failed: {}", source.describe(), command.name, msg);
                reply(&source, &msg).await;
                Outcome::UserError
            }
            Err(CommandError::Fault(e)) => {
                error!("{}: {} failed: {:?}", source.describe(), command.name, e);
                reply(&source, GENERIC_FAULT).await;
                Outcome::Fault
            }
        }
    }

    /// Sweep idle sources, then fetch or create the one for `channel`.
    async fn resolve_source(&mut self, channel: &ChannelRef) -> ChannelSource {
        let now = Instant::now();
        self.sources.sweep(now);

        if let Some(source) = self.sources.touch(&channel.id, now) {
            return source.clone();
        }

        let channel = self.describe_channel(channel).await;
        let source = ChannelSource::new(channel, self.prefix, self.gateway.clone());
        debug!("New source {}", source.describe());
        self.sources.insert(source.channel().id, source, now).clone()
    }

    /// Fill in the name of a guild channel, if the gateway knows it.
    async fn describe_channel(&self, channel: &ChannelRef) -> ChannelRef {
        if channel.name.is_some() || channel.is_private() {
            return channel.clone();
        }

        match self.gateway.channel(channel.id).await {
            Ok(mut full) => {
                // Events carry the guild even when the lookup doesn't
                full.guild_id = full.guild_id.or(channel.guild_id);
                full
            }
            Err(e) => {
                warn!("Couldn't look up channel {}: {}", channel.id, e);
                channel.clone()
            }
        }
    }
}

async fn reply(source: &ChannelSource, text: &str) {
    if let Err(e) = source.reply(text).await {
        error!("{}: failed to send reply: {}", source.describe(), e);
    }
}

//! Platform-neutral chat types.

use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

snowflake!(
    /// Channel identifier.
    ChannelId
);
snowflake!(
    /// Guild (server) identifier.
    GuildId
);
snowflake!(
    /// User identifier.
    UserId
);
snowflake!(
    /// Role identifier.
    RoleId
);
snowflake!(
    /// Message identifier.
    MessageId
);

/// A channel a message was seen in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: ChannelId,
    /// Owning guild, `None` for direct messages.
    pub guild_id: Option<GuildId>,
    /// Channel name, if the platform reported one.
    pub name: Option<String>,
}

impl ChannelRef {
    /// Create a reference to a guild channel.
    pub fn guild(id: ChannelId, guild_id: GuildId, name: Option<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name,
        }
    }

    /// Create a reference to a direct message channel.
    pub fn private(id: ChannelId) -> Self {
        Self {
            id,
            guild_id: None,
            name: None,
        }
    }

    /// Whether this is a direct message channel.
    pub fn is_private(&self) -> bool {
        self.guild_id.is_none()
    }

    /// Human readable name: `#name` for named guild channels, the id otherwise.
    pub fn display_name(&self) -> String {
        match (&self.name, self.is_private()) {
            (Some(name), false) if !name.is_empty() => format!("#{}", name),
            _ => self.id.to_string(),
        }
    }
}

/// The author of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    /// Automated (bot) account.
    pub bot: bool,
}

impl UserRef {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bot: false,
        }
    }

    /// Check a configured identity entry against this user.
    ///
    /// Entries may name the user either by account name or by numeric id.
    pub fn matches(&self, entry: &str) -> bool {
        let entry = entry.trim();
        entry == self.name || entry == self.id.to_string()
    }
}

/// A message previously sent by the bot, usable for edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel_id: ChannelId,
    pub id: MessageId,
}

/// A guild role as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
    pub position: i64,
    /// Raw permission bits.
    pub permissions: u64,
    /// Managed by an integration; cannot be assigned by hand.
    pub managed: bool,
}

impl RoleInfo {
    /// The `@everyone` role shares its id with the guild.
    pub fn is_everyone(&self, guild: GuildId) -> bool {
        self.id.0 == guild.0
    }
}

/// Chat message received from the gateway.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel: ChannelRef,
    pub author: UserRef,
    pub text: String,
}

/// Events surfaced by a gateway receiver.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// The session is ready; carries the bot's own account.
    Ready { user: UserRef },
    /// A chat message was posted.
    Message(InboundMessage),
}

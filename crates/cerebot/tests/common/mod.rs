//! Common test utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cerebot::access::AccessList;
use cerebot::commands::builtin_table;
use cerebot::config::DiscordConfig;
use cerebot::Dispatcher;
use chat_gateway::*;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GUILD: GuildId = GuildId(100);
pub const CRAWL: ChannelId = ChannelId(10);
pub const DM: ChannelId = ChannelId(20);
pub const MINOTAUR: RoleId = RoleId(1);

/// Something the bot did through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(ChannelId, String),
    Edit(MessageId, String),
    AddRole(UserId, RoleId),
    RemoveRole(UserId, RoleId),
}

/// In-memory gateway that records every outbound call.
#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    member_roles: Mutex<HashMap<UserId, Vec<RoleId>>>,
    next_id: Mutex<u64>,
    fail_edits: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose edits always fail.
    pub fn failing_edits() -> Self {
        Self {
            fail_edits: true,
            ..Self::default()
        }
    }

    pub fn give_role(&self, user: UserId, role: RoleId) {
        self.member_roles
            .lock()
            .unwrap()
            .entry(user)
            .or_default()
            .push(role);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts sent as new messages.
    pub fn sent(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(_, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageHandle, GatewayError> {
        self.record(Call::Send(channel, text.to_string()));
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        Ok(MessageHandle {
            channel_id: channel,
            id: MessageId(*next_id),
        })
    }

    async fn edit(
        &self,
        message: &MessageHandle,
        text: &str,
    ) -> Result<MessageHandle, GatewayError> {
        if self.fail_edits {
            return Err(GatewayError::SendFailed("Unknown Message".into()));
        }
        self.record(Call::Edit(message.id, text.to_string()));
        Ok(message.clone())
    }

    async fn channel(&self, channel: ChannelId) -> Result<ChannelRef, GatewayError> {
        if channel == CRAWL {
            Ok(ChannelRef::guild(CRAWL, GUILD, Some("crawl".into())))
        } else {
            Err(GatewayError::NotFound(channel.0))
        }
    }

    async fn guild_roles(&self, _guild: GuildId) -> Result<Vec<RoleInfo>, GatewayError> {
        let role = |id: u64, name: &str, position: i64, permissions: u64| RoleInfo {
            id: RoleId(id),
            name: name.into(),
            position,
            permissions,
            managed: false,
        };
        Ok(vec![
            role(GUILD.0, "@everyone", 0, 1),
            role(MINOTAUR.0, "Minotaur", 1, 1),
            role(2, "Bot", 2, 3),
            role(3, "Admin", 3, 255),
        ])
    }

    async fn member_role_ids(
        &self,
        _guild: GuildId,
        user: UserId,
    ) -> Result<Vec<RoleId>, GatewayError> {
        Ok(self
            .member_roles
            .lock()
            .unwrap()
            .get(&user)
            .cloned()
            .unwrap_or_default())
    }

    async fn bot_role_ids(&self, _guild: GuildId) -> Result<Vec<RoleId>, GatewayError> {
        Ok(vec![RoleId(2)])
    }

    async fn add_role(
        &self,
        _guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), GatewayError> {
        self.record(Call::AddRole(user, role));
        self.give_role(user, role);
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), GatewayError> {
        self.record(Call::RemoveRole(user, role));
        if let Some(roles) = self.member_roles.lock().unwrap().get_mut(&user) {
            roles.retain(|r| *r != role);
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

pub fn test_config() -> DiscordConfig {
    DiscordConfig {
        token: SecretString::new("test-token".into()),
        admins: vec!["gammafunk".into()],
        ignored_users: vec!["Sequell".into()],
        command_prefix: '!',
        command_period: Duration::from_secs(60),
        command_limit: 3,
        source_idle_timeout: Duration::from_secs(30 * 60),
        fake_connect: true,
        animations: true,
        roles: true,
    }
}

/// A dispatcher over the built-in commands.
pub fn test_dispatcher(gateway: Arc<FakeGateway>) -> Dispatcher {
    let config = test_config();
    let access = Arc::new(AccessList::fixed(
        config.admins.clone(),
        config.ignored_users.clone(),
    ));
    let table = builtin_table(&config).unwrap();
    Dispatcher::new(gateway, table, access, &config)
}

pub fn user(id: u64, name: &str) -> UserRef {
    UserRef::new(id, name)
}

pub fn in_crawl(author: UserRef, text: &str) -> InboundMessage {
    InboundMessage {
        channel: ChannelRef::guild(CRAWL, GUILD, None),
        author,
        text: text.into(),
    }
}

pub fn in_dm(author: UserRef, text: &str) -> InboundMessage {
    InboundMessage {
        channel: ChannelRef::private(DM),
        author,
        text: text.into(),
    }
}

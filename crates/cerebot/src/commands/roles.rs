//! Self-assignable role commands.

use super::{Arguments, CommandContext, CommandHandler};
use crate::error::{CommandError, CommandResult};
use async_trait::async_trait;
use chat_gateway::{GuildId, RoleInfo};
use tracing::info;

fn guild(ctx: &CommandContext<'_>) -> Result<GuildId, CommandError> {
    ctx.source
        .channel()
        .guild_id
        .ok_or_else(|| CommandError::user("This command must be run in a channel."))
}

async fn find_role(ctx: &CommandContext<'_>, name: &str) -> Result<RoleInfo, CommandError> {
    ctx.source
        .vanity_roles()
        .await?
        .into_iter()
        .find(|r| r.name == name)
        .ok_or_else(|| CommandError::user(format!("Unknown role: {}", name)))
}

pub struct ListRolesHandler;

#[async_trait]
impl CommandHandler for ListRolesHandler {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &Arguments) -> CommandResult {
        let roles = ctx.source.vanity_roles().await?;
        let message = if roles.is_empty() {
            "No available roles found.".to_string()
        } else {
            roles
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        ctx.source.reply(&message).await?;
        Ok(())
    }
}

pub struct AddRoleHandler;

#[async_trait]
impl CommandHandler for AddRoleHandler {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &Arguments) -> CommandResult {
        let guild = guild(ctx)?;
        let name = args.required(0)?;
        let role = find_role(ctx, name).await?;
        let user = ctx.caller;
        let gateway = ctx.source.gateway();

        let held = gateway.member_role_ids(guild, user.id).await?;
        let message = if held.contains(&role.id) {
            format!("Member {} already has role {}", user.name, role.name)
        } else {
            gateway.add_role(guild, user.id, role.id).await?;
            info!("{}: gave {} role {}", ctx.source.describe(), user.name, role.name);
            format!("Member {} has been given role {}", user.name, role.name)
        };

        ctx.source.reply(&message).await?;
        Ok(())
    }
}

pub struct RemoveRoleHandler;

#[async_trait]
impl CommandHandler for RemoveRoleHandler {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &Arguments) -> CommandResult {
        let guild = guild(ctx)?;
        let name = args.required(0)?;
        let role = find_role(ctx, name).await?;
        let user = ctx.caller;
        let gateway = ctx.source.gateway();

        let held = gateway.member_role_ids(guild, user.id).await?;
        let message = if held.contains(&role.id) {
            gateway.remove_role(guild, user.id, role.id).await?;
            info!("{}: removed role {} from {}", ctx.source.describe(), role.name, user.name);
            format!("Member {} has lost role {}", user.name, role.name)
        } else {
            format!("Member {} does not have role {}", user.name, role.name)
        };

        ctx.source.reply(&message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessList;
    use crate::commands::CommandTable;
    use crate::source::ChannelSource;
    use crate::testing::{handle, MockGateway};
    use chat_gateway::{ChannelId, ChannelRef, RoleId, UserId, UserRef};
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    const GUILD: GuildId = GuildId(100);
    const USER: UserId = UserId(42);

    fn role(id: u64, name: &str, position: i64, permissions: u64) -> RoleInfo {
        RoleInfo {
            id: RoleId(id),
            name: name.into(),
            position,
            permissions,
            managed: false,
        }
    }

    /// Gateway with one vanity role ("Minotaur") that records replies.
    fn gateway(held: Vec<RoleId>, replies: Arc<Mutex<Vec<String>>>) -> MockGateway {
        let mut gateway = MockGateway::new();
        gateway.expect_guild_roles().returning(|_| {
            Ok(vec![
                role(100, "@everyone", 0, 1),
                role(1, "Minotaur", 1, 1),
                role(2, "Moderator", 2, 7),
                role(3, "Bot", 3, 3),
            ])
        });
        gateway
            .expect_bot_role_ids()
            .returning(|_| Ok(vec![RoleId(3)]));
        gateway
            .expect_member_role_ids()
            .with(eq(GUILD), eq(USER))
            .returning(move |_, _| Ok(held.clone()));
        gateway.expect_send().returning(move |channel, text| {
            replies.lock().unwrap().push(text.to_string());
            Ok(handle(channel, 1))
        });
        gateway
    }

    async fn run(
        handler: &dyn CommandHandler,
        gateway: MockGateway,
        role: Option<&str>,
    ) -> CommandResult {
        let source = ChannelSource::new(
            ChannelRef::guild(ChannelId(1), GUILD, Some("crawl".into())),
            '!',
            Arc::new(gateway),
        );
        let caller = UserRef::new(USER, "minmay");
        let access = AccessList::fixed(vec![], vec![]);
        let table = CommandTable::new();
        let ctx = CommandContext {
            source: &source,
            caller: &caller,
            access: &access,
            table: &table,
        };
        handler
            .execute(&ctx, &Arguments::new(vec![role.map(String::from)]))
            .await
    }

    #[tokio::test]
    async fn test_listroles() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        run(&ListRolesHandler, gateway(vec![], replies.clone()), None)
            .await
            .unwrap();
        assert_eq!(*replies.lock().unwrap(), vec!["Minotaur"]);
    }

    #[tokio::test]
    async fn test_listroles_none_available() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = MockGateway::new();
        gateway.expect_guild_roles().returning(|_| Ok(vec![]));
        gateway.expect_bot_role_ids().returning(|_| Ok(vec![]));
        let capture = replies.clone();
        gateway.expect_send().returning(move |channel, text| {
            capture.lock().unwrap().push(text.to_string());
            Ok(handle(channel, 1))
        });

        run(&ListRolesHandler, gateway, None).await.unwrap();
        assert_eq!(*replies.lock().unwrap(), vec!["No available roles found."]);
    }

    #[tokio::test]
    async fn test_addrole() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = gateway(vec![], replies.clone());
        gateway
            .expect_add_role()
            .with(eq(GUILD), eq(USER), eq(RoleId(1)))
            .times(1)
            .returning(|_, _, _| Ok(()));

        run(&AddRoleHandler, gateway, Some("Minotaur")).await.unwrap();
        assert_eq!(
            *replies.lock().unwrap(),
            vec!["Member minmay has been given role Minotaur"]
        );
    }

    #[tokio::test]
    async fn test_addrole_already_held() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = gateway(vec![RoleId(1)], replies.clone());
        gateway.expect_add_role().never();

        run(&AddRoleHandler, gateway, Some("Minotaur")).await.unwrap();
        assert_eq!(
            *replies.lock().unwrap(),
            vec!["Member minmay already has role Minotaur"]
        );
    }

    #[tokio::test]
    async fn test_addrole_unknown() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = gateway(vec![], replies);
        gateway.expect_add_role().never();

        // Moderator exists but is not self-assignable
        let result = run(&AddRoleHandler, gateway, Some("Moderator")).await;
        match result {
            Err(CommandError::User(message)) => assert_eq!(message, "Unknown role: Moderator"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_removerole() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = gateway(vec![RoleId(1)], replies.clone());
        gateway
            .expect_remove_role()
            .with(eq(GUILD), eq(USER), eq(RoleId(1)))
            .times(1)
            .returning(|_, _, _| Ok(()));

        run(&RemoveRoleHandler, gateway, Some("Minotaur")).await.unwrap();
        assert_eq!(
            *replies.lock().unwrap(),
            vec!["Member minmay has lost role Minotaur"]
        );
    }

    #[tokio::test]
    async fn test_removerole_not_held() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = gateway(vec![], replies.clone());
        gateway.expect_remove_role().never();

        run(&RemoveRoleHandler, gateway, Some("Minotaur")).await.unwrap();
        assert_eq!(
            *replies.lock().unwrap(),
            vec!["Member minmay does not have role Minotaur"]
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_is_fault() {
        let replies = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = gateway(vec![], replies);
        gateway
            .expect_add_role()
            .returning(|_, _, _| Err(chat_gateway::GatewayError::NotConnected));

        let result = run(&AddRoleHandler, gateway, Some("Minotaur")).await;
        assert!(matches!(result, Err(CommandError::Fault(_))));
    }
}

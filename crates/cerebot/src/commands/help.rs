use super::{Arguments, CommandContext, CommandHandler};
use crate::error::CommandResult;
use async_trait::async_trait;

/// Lists the commands the caller is allowed to run here.
pub struct HelpHandler;

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &Arguments) -> CommandResult {
        let is_admin = ctx.access.is_admin(ctx.caller);
        let private = ctx.source.is_private();
        let prefix = ctx.source.prefix();

        let usable: Vec<String> = ctx
            .table
            .iter()
            .filter(|c| is_admin || !c.requires_admin)
            .filter(|c| is_admin || !(private && c.requires_public_channel))
            .map(|c| c.usage(prefix))
            .collect();

        let message = if usable.is_empty() {
            "No commands available.".to_string()
        } else {
            format!("Available commands: {}", usable.join(", "))
        };
        ctx.source.reply(&message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessList;
    use crate::commands::{ArgSpec, CommandDef, CommandTable};
    use crate::source::ChannelSource;
    use crate::testing::{handle, MockGateway};
    use chat_gateway::{ChannelId, ChannelRef, GuildId, UserRef};
    use std::sync::{Arc, Mutex};

    fn table() -> CommandTable {
        let mut table = CommandTable::new();
        table
            .register(CommandDef::new("bothelp", "Help", Arc::new(HelpHandler)))
            .unwrap();
        table
            .register(
                CommandDef::new("version", "Version", Arc::new(HelpHandler)).admin_only(),
            )
            .unwrap();
        table
            .register(
                CommandDef::new("addrole", "Add role", Arc::new(HelpHandler))
                    .arg(ArgSpec::required(r".+$", "ROLE").unwrap())
                    .public_only(),
            )
            .unwrap();
        table
    }

    async fn help_text(channel: ChannelRef, caller: &str) -> String {
        let sent = Arc::new(Mutex::new(String::new()));
        let mut gateway = MockGateway::new();
        let capture = sent.clone();
        gateway.expect_send().times(1).returning(move |channel, text| {
            *capture.lock().unwrap() = text.to_string();
            Ok(handle(channel, 1))
        });

        let source = ChannelSource::new(channel, '!', Arc::new(gateway));
        let access = AccessList::fixed(vec!["admin".into()], vec![]);
        let table = table();
        let caller = UserRef::new(1u64, caller);
        let ctx = CommandContext {
            source: &source,
            caller: &caller,
            access: &access,
            table: &table,
        };

        HelpHandler
            .execute(&ctx, &Arguments::default())
            .await
            .unwrap();
        let text = sent.lock().unwrap().clone();
        text
    }

    #[tokio::test]
    async fn test_public_user() {
        let channel = ChannelRef::guild(ChannelId(1), GuildId(2), None);
        assert_eq!(
            help_text(channel, "someone").await,
            "Available commands: !addrole ROLE, !bothelp"
        );
    }

    #[tokio::test]
    async fn test_private_user() {
        let channel = ChannelRef::private(ChannelId(1));
        assert_eq!(
            help_text(channel, "someone").await,
            "Available commands: !bothelp"
        );
    }

    #[tokio::test]
    async fn test_admin_sees_everything() {
        let channel = ChannelRef::private(ChannelId(1));
        assert_eq!(
            help_text(channel, "admin").await,
            "Available commands: !addrole ROLE, !bothelp, !version"
        );
    }
}

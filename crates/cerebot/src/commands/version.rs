use super::{Arguments, CommandContext, CommandHandler};
use crate::error::CommandResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Reports the running version and when the bot started.
pub struct VersionHandler {
    started: DateTime<Utc>,
}

impl VersionHandler {
    pub fn new() -> Self {
        Self {
            started: Utc::now(),
        }
    }

    fn message(&self) -> String {
        format!(
            "Version {} (up since {})",
            env!("CARGO_PKG_VERSION"),
            self.started.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

impl Default for VersionHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for VersionHandler {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &Arguments) -> CommandResult {
        ctx.source.reply(&self.message()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message() {
        let message = VersionHandler::new().message();
        assert!(message.starts_with(&format!("Version {}", env!("CARGO_PKG_VERSION"))));
        assert!(message.contains("up since"));
    }
}

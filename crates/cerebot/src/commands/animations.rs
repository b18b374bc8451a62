//! Animated message commands.

use super::{Arguments, CommandContext, CommandHandler};
use crate::animation::{effects, Animation};
use crate::error::{CommandError, CommandResult};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Longest text the text effects accept, in characters.
pub const MAX_TEXT_LEN: usize = 40;

/// The available animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Glasses,
    Deal,
    Dance,
    ZxcDance,
    Decrypt,
    Glitch,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::Glasses,
        Effect::Deal,
        Effect::Dance,
        Effect::ZxcDance,
        Effect::Decrypt,
        Effect::Glitch,
    ];

    /// Command name.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Glasses => "glasses",
            Effect::Deal => "deal",
            Effect::Dance => "dance",
            Effect::ZxcDance => "zxcdance",
            Effect::Decrypt => "decrypt",
            Effect::Glitch => "glitch",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Effect::Glasses => "Put on your sunglasses",
            Effect::Deal => "Deal with it",
            Effect::Dance => "Dance",
            Effect::ZxcDance => "Dance like a zxc player",
            Effect::Decrypt => "Decrypt some text",
            Effect::Glitch => "Glitch some text",
        }
    }

    pub fn takes_text(self) -> bool {
        matches!(self, Effect::Decrypt | Effect::Glitch)
    }

    fn default_text(self) -> &'static str {
        match self {
            Effect::Glitch => "deal with it",
            _ => "DUNGEON CRAWL STONE SOUP",
        }
    }

    /// Build the frames. `text` is ignored by the fixed animations.
    pub fn animation<R: Rng + ?Sized>(self, text: Option<&str>, rng: &mut R) -> Animation {
        let text = text.unwrap_or_else(|| self.default_text());
        match self {
            Effect::Glasses => effects::glasses(),
            Effect::Deal => effects::deal(),
            Effect::Dance => effects::dance(),
            Effect::ZxcDance => effects::zxcdance(),
            Effect::Decrypt => effects::decrypt(text, rng),
            Effect::Glitch => effects::glitch(text, rng),
        }
    }
}

/// Starts an animation in the calling channel and returns right away.
pub struct AnimationCommand {
    effect: Effect,
}

impl AnimationCommand {
    pub fn new(effect: Effect) -> Self {
        Self { effect }
    }
}

#[async_trait]
impl CommandHandler for AnimationCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &Arguments) -> CommandResult {
        let text = if self.effect.takes_text() {
            args.get(0)
        } else {
            None
        };

        if let Some(text) = text {
            if text.chars().count() > MAX_TEXT_LEN {
                return Err(CommandError::user(format!(
                    "Text must be at most {} characters",
                    MAX_TEXT_LEN
                )));
            }
        }

        let animation = self.effect.animation(text, &mut StdRng::from_entropy());
        debug!(
            "{}: starting {} ({} frames)",
            ctx.source.describe(),
            self.effect.name(),
            animation.len()
        );
        animation.spawn(ctx.source.gateway().clone(), ctx.source.channel().id);
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
    use chat_gateway::{ChannelId, ChannelRef, GuildId, UserRef};
    use std::sync::Arc;
    use std::time::Duration;

    fn source(gateway: MockGateway) -> ChannelSource {
        ChannelSource::new(
            ChannelRef::guild(ChannelId(1), GuildId(2), Some("crawl".into())),
            '!',
            Arc::new(gateway),
        )
    }

    async fn run(effect: Effect, source: &ChannelSource, text: Option<&str>) -> CommandResult {
        let caller = UserRef::new(10u64, "minmay");
        let access = AccessList::fixed(vec![], vec![]);
        let table = CommandTable::new();
        let ctx = CommandContext {
            source,
            caller: &caller,
            access: &access,
            table: &table,
        };
        let args = Arguments::new(vec![text.map(String::from)]);
        AnimationCommand::new(effect).execute(&ctx, &args).await
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = Effect::ALL.iter().map(|e| e.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Effect::ALL.len());
    }

    #[test]
    fn test_default_text() {
        let mut rng = StdRng::seed_from_u64(0);
        let animation = Effect::Decrypt.animation(None, &mut rng);
        assert_eq!(
            animation.frames().last().unwrap().text,
            "```DUNGEON CRAWL STONE SOUP```"
        );

        let animation = Effect::Glitch.animation(None, &mut rng);
        assert_eq!(animation.frames().last().unwrap().text, "```deal with it```");
    }

    #[tokio::test]
    async fn test_text_too_long() {
        let src = source(MockGateway::new());
        let long = "x".repeat(MAX_TEXT_LEN + 1);

        let result = run(Effect::Glitch, &src, Some(&long)).await;
        assert!(matches!(result, Err(CommandError::User(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_before_animation_finishes() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_send()
            .times(1)
            .returning(|channel, _| Ok(handle(channel, 1)));
        gateway
            .expect_edit()
            .times(2)
            .returning(|message, _| Ok(message.clone()));
        let src = source(gateway);

        let start = tokio::time::Instant::now();
        run(Effect::Glasses, &src, None).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Let the spawned task play out
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

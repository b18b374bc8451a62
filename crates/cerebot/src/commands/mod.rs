//! Bot command table and handlers.

mod animations;
mod help;
pub mod parser;
mod roles;
mod say;
mod version;

pub use animations::{AnimationCommand, Effect};
pub use help::HelpHandler;
pub use parser::{parse, Arguments, Parsed, SyntaxError, SyntaxProblem};
pub use roles::{AddRoleHandler, ListRolesHandler, RemoveRoleHandler};
pub use say::SayHandler;
pub use version::VersionHandler;

use crate::access::AccessList;
use crate::config::DiscordConfig;
use crate::error::{AppError, AppResult, CommandResult};
use crate::source::ChannelSource;
use async_trait::async_trait;
use chat_gateway::UserRef;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a handler can see about one invocation.
pub struct CommandContext<'a> {
    pub source: &'a ChannelSource,
    pub caller: &'a UserRef,
    pub access: &'a AccessList,
    pub table: &'a CommandTable,
}

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Execute the command. Output goes through `ctx.source`.
    async fn execute(&self, ctx: &CommandContext<'_>, args: &Arguments) -> CommandResult;
}

/// One positional argument of a command.
pub struct ArgSpec {
    /// Anchored at the start of the unconsumed text.
    pub pattern: Regex,
    pub description: String,
    pub required: bool,
}

impl ArgSpec {
    pub fn required(pattern: &str, description: impl Into<String>) -> Result<Self, regex::Error> {
        Self::new(pattern, description, true)
    }

    pub fn optional(pattern: &str, description: impl Into<String>) -> Result<Self, regex::Error> {
        Self::new(pattern, description, false)
    }

    fn new(
        pattern: &str,
        description: impl Into<String>,
        required: bool,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{})", pattern))?,
            description: description.into(),
            required,
        })
    }
}

/// A registered command.
pub struct CommandDef {
    pub name: String,
    pub help: String,
    pub args: Vec<ArgSpec>,
    pub requires_admin: bool,
    /// Refused in direct messages (admins excepted).
    pub requires_public_channel: bool,
    /// Counted against the command limit.
    pub logged: bool,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDef {
    /// A command open to everyone, anywhere, counted against the limit.
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            args: Vec::new(),
            requires_admin: false,
            requires_public_channel: false,
            logged: true,
            handler,
        }
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.requires_admin = true;
        self
    }

    pub fn public_only(mut self) -> Self {
        self.requires_public_channel = true;
        self
    }

    pub fn unlogged(mut self) -> Self {
        self.logged = false;
        self
    }

    /// Usage string, e.g. `!roll [COUNT] SIDES`.
    pub fn usage(&self, prefix: char) -> String {
        let mut usage = format!("{}{}", prefix, self.name);
        for spec in &self.args {
            if spec.required {
                usage.push_str(&format!(" {}", spec.description));
            } else {
                usage.push_str(&format!(" [{}]", spec.description));
            }
        }
        usage
    }
}

/// Registry of commands by exact name.
#[derive(Default)]
pub struct CommandTable {
    commands: BTreeMap<String, CommandDef>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Names must be unique.
    pub fn register(&mut self, command: CommandDef) -> AppResult<()> {
        if self.commands.contains_key(&command.name) {
            return Err(AppError::DuplicateCommand(command.name));
        }
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandDef> {
        self.commands.get(name)
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDef> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build the bot's command table.
pub fn builtin_table(config: &DiscordConfig) -> AppResult<CommandTable> {
    let mut table = CommandTable::new();

    table.register(
        CommandDef::new("version", "Show the bot version", Arc::new(VersionHandler::new()))
            .admin_only()
            .unlogged(),
    )?;
    table.register(
        CommandDef::new("bothelp", "List the commands you can use", Arc::new(HelpHandler))
            .unlogged(),
    )?;
    table.register(
        CommandDef::new("say", "Send a message to a channel", Arc::new(SayHandler))
            .arg(ArgSpec::required(r"\d+", "SERVER")?)
            .arg(ArgSpec::required(r"\d+", "CHANNEL")?)
            .arg(ArgSpec::required(r".+$", "MESSAGE")?)
            .admin_only()
            .unlogged(),
    )?;

    if config.roles {
        table.register(
            CommandDef::new(
                "listroles",
                "List roles you can give yourself",
                Arc::new(ListRolesHandler),
            )
            .public_only(),
        )?;
        table.register(
            CommandDef::new("addrole", "Give yourself a role", Arc::new(AddRoleHandler))
                .arg(ArgSpec::required(r".+$", "ROLE")?)
                .public_only(),
        )?;
        table.register(
            CommandDef::new(
                "removerole",
                "Remove a role from yourself",
                Arc::new(RemoveRoleHandler),
            )
            .arg(ArgSpec::required(r".+$", "ROLE")?)
            .public_only(),
        )?;
    }

    if config.animations {
        for effect in Effect::ALL {
            let mut command = CommandDef::new(
                effect.name(),
                effect.help(),
                Arc::new(AnimationCommand::new(effect)),
            );
            if effect.takes_text() {
                command = command.arg(ArgSpec::optional(r".+$", "TEXT")?);
            }
            table.register(command)?;
        }
    }

    Ok(table)
}

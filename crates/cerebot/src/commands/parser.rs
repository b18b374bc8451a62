//! Command line parsing.

use crate::commands::{CommandDef, CommandTable};
use crate::error::CommandError;
use thiserror::Error;

/// Positional arguments bound by a command's argument specs.
///
/// Optional arguments that didn't match are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<Option<String>>);

impl Arguments {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self(values)
    }

    /// Argument at `index`, if it was given.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|v| v.as_deref())
    }

    /// Argument at `index` that the parser guarantees is present.
    pub fn required(&self, index: usize) -> Result<&str, CommandError> {
        self.get(index)
            .ok_or_else(|| anyhow::anyhow!("required argument {} missing", index).into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a line of chat turned out to be.
pub enum Parsed<'a> {
    /// Not a command; ordinary conversation.
    Chat,
    /// A known command with its bound arguments.
    Command {
        command: &'a CommandDef,
        args: Arguments,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxProblem {
    /// A required argument didn't match; carries its description.
    #[error("Missing or invalid {0}")]
    Missing(String),

    /// Text left over after all arguments were bound.
    #[error("Too many arguments")]
    Trailing,
}

/// User-correctable argument error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{problem}. Usage: {usage}")]
pub struct SyntaxError {
    pub command: String,
    pub problem: SyntaxProblem,
    pub usage: String,
}

/// Parse a chat line against the command table.
///
/// Lines that don't start with `prefix`, or whose first token isn't a known
/// command, are [`Parsed::Chat`].
pub fn parse<'a>(
    table: &'a CommandTable,
    prefix: char,
    text: &str,
) -> Result<Parsed<'a>, SyntaxError> {
    let Some(line) = text.trim_start().strip_prefix(prefix) else {
        return Ok(Parsed::Chat);
    };

    let name_end = line.find(char::is_whitespace).unwrap_or(line.len());
    let (name, mut remaining) = line.split_at(name_end);

    let Some(command) = table.get(name) else {
        return Ok(Parsed::Chat);
    };

    let mut values = Vec::with_capacity(command.args.len());
    for spec in &command.args {
        let rest = remaining.trim_start();
        match spec.pattern.find(rest).filter(|m| m.end() > 0) {
            Some(m) => {
                values.push(Some(m.as_str().trim_end().to_string()));
                remaining = &rest[m.end()..];
            }
            None if spec.required => {
                let problem = SyntaxProblem::Missing(spec.description.clone());
                return Err(syntax_error(command, prefix, problem));
            }
            None => values.push(None),
        }
    }

    if !remaining.trim().is_empty() {
        return Err(syntax_error(command, prefix, SyntaxProblem::Trailing));
    }

    Ok(Parsed::Command {
        command,
        args: Arguments(values),
    })
}

fn syntax_error(command: &CommandDef, prefix: char, problem: SyntaxProblem) -> SyntaxError {
    SyntaxError {
        command: command.name.clone(),
        problem,
        usage: command.usage(prefix),
    }
}

//! Cerebot: a Discord chat bot for Dungeon Crawl Stone Soup.
//!
//! Chat lines flow from the gateway through the [`dispatcher`], which parses
//! them against the command table, checks permissions and the command limit,
//! and runs the matching handler.

pub mod access;
pub mod animation;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod permission;
pub mod ratelimit;
pub mod source;

#[cfg(test)]
mod testing;

pub use crate::config::Config;
pub use dispatcher::{Dispatcher, Outcome};
pub use error::{AppError, AppResult, CommandError, CommandResult};
pub use manager::Manager;

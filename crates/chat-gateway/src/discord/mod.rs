//! Discord adapter built on twilight.

mod client;
mod receiver;

pub use client::DiscordGateway;
pub use receiver::{inbound_message, EventReceiver};

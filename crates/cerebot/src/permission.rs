//! Who may run which command where.

use crate::access::AccessList;
use crate::commands::CommandDef;
use chat_gateway::{ChannelRef, UserRef};

pub const ADMIN_ONLY: &str = "This command is admin only.";
pub const PUBLIC_ONLY: &str = "This command must be run in a channel.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Allowed,
    /// Refused with a reply to the caller.
    Denied(&'static str),
    /// Refused without any reply.
    Ignored,
}

/// Decide whether `user` may run `command` in `channel`. The first failing
/// check wins.
///
/// Ignored callers are turned away silently before anything else, admins
/// included. Otherwise admins pass every check.
pub fn check(
    access: &AccessList,
    user: &UserRef,
    command: &CommandDef,
    channel: &ChannelRef,
) -> Permission {
    if access.is_ignored(user) {
        return Permission::Ignored;
    }

    if !command.requires_admin && !command.requires_public_channel {
        return Permission::Allowed;
    }

    let is_admin = access.is_admin(user);
    if command.requires_admin && !is_admin {
        return Permission::Denied(ADMIN_ONLY);
    }
    if command.requires_public_channel && channel.is_private() && !is_admin {
        return Permission::Denied(PUBLIC_ONLY);
    }

    Permission::Allowed
}

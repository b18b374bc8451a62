//! Live admin and ignored-user lists.

use crate::config::{AccessConfig, AccessLists};
use chat_gateway::UserRef;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::{info, warn};

struct Snapshot {
    lists: AccessLists,
    modified: Option<SystemTime>,
}

/// Admin and ignored-user lists, kept in step with the configuration file.
///
/// Every query checks the file's modification time and re-reads the lists
/// when it changed, so edits apply without a restart. A file that fails to
/// parse leaves the previous lists in place.
pub struct AccessList {
    path: Option<PathBuf>,
    snapshot: Mutex<Snapshot>,
}

impl AccessList {
    /// Lists with no backing file.
    pub fn fixed(admins: Vec<String>, ignored_users: Vec<String>) -> Self {
        Self {
            path: None,
            snapshot: Mutex::new(Snapshot {
                lists: AccessLists {
                    admins,
                    ignored_users,
                },
                modified: None,
            }),
        }
    }

    /// Lists backed by a configuration file, seeded with the values loaded at start-up.
    pub fn from_file(
        path: impl Into<PathBuf>,
        admins: Vec<String>,
        ignored_users: Vec<String>,
    ) -> Self {
        let path = path.into();
        let modified = modified_time(&path);

        Self {
            path: Some(path),
            snapshot: Mutex::new(Snapshot {
                lists: AccessLists {
                    admins,
                    ignored_users,
                },
                modified,
            }),
        }
    }

    pub fn is_admin(&self, user: &UserRef) -> bool {
        self.with_lists(|lists| lists.admins.iter().any(|entry| user.matches(entry)))
    }

    /// Configured as ignored, or an automated account.
    pub fn is_ignored(&self, user: &UserRef) -> bool {
        user.bot
            || self.with_lists(|lists| {
                lists
                    .ignored_users
                    .iter()
                    .any(|entry| user.matches(entry))
            })
    }

    fn with_lists<T>(&self, f: impl FnOnce(&AccessLists) -> T) -> T {
        let mut snapshot = match self.snapshot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(path) = &self.path {
            let modified = modified_time(path);
            if modified.is_some() && modified != snapshot.modified {
                match AccessConfig::load(path) {
                    Ok(config) => {
                        info!(
                            "Reloaded access lists ({} admins, {} ignored)",
                            config.discord.admins.len(),
                            config.discord.ignored_users.len()
                        );
                        snapshot.lists = config.discord;
                    }
                    Err(e) => warn!("Keeping previous access lists: {:#}", e),
                }
                snapshot.modified = modified;
            }
        }

        f(&snapshot.lists)
    }
}

fn modified_time(path: &std::path::Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

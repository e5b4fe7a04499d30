// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use common::{Task, User};
use parking_lot::RwLock;
use tracing::debug;

/// One full, consistent result of a joined users+tasks fetch.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
}

/// In-memory holder of the last successfully fetched snapshot, shared by
/// every page handler.
///
/// There is no partial-update merge: a snapshot is replaced wholesale or
/// not at all, so the cache always shows exactly one successful fetch.
/// Refreshes are ordered by a generation ticket taken before the fetch
/// starts; a response that resolves after a newer ticket has installed is
/// discarded instead of clobbering fresher data.
pub struct EntityCache {
    inner: RwLock<Inner>,
}

struct Inner {
    snapshot: Arc<Snapshot>,
    /// Ticket of the installed snapshot (0 = nothing installed yet).
    installed: u64,
    /// Last ticket handed out.
    issued: u64,
}

impl EntityCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                snapshot: Arc::new(Snapshot::default()),
                installed: 0,
                issued: 0,
            }),
        }
    }

    /// Takes a generation ticket for a refresh that is about to start.
    pub fn begin_refresh(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.issued += 1;
        inner.issued
    }

    /// Installs a fetched snapshot unless a newer ticket already
    /// installed one. Returns whether the snapshot was accepted.
    pub fn install(&self, ticket: u64, users: Vec<User>, tasks: Vec<Task>) -> bool {
        let mut inner = self.inner.write();
        if ticket <= inner.installed {
            debug!(
                "Discarding stale snapshot (ticket {} <= installed {})",
                ticket, inner.installed
            );
            return false;
        }
        inner.installed = ticket;
        inner.snapshot = Arc::new(Snapshot { users, tasks });
        true
    }

    /// Current snapshot. Empty until the first successful refresh.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.read().snapshot.clone()
    }

    /// Drops the cached entities. The generation counters are kept so an
    /// in-flight refresh still resolves in order.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.snapshot = Arc::new(Snapshot::default());
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            full_name: format!("User {id}"),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn snapshot_is_empty_before_first_install() {
        let cache = EntityCache::new();
        let snapshot = cache.snapshot();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.tasks.is_empty());
    }

    #[test]
    fn install_replaces_snapshot_wholesale() {
        let cache = EntityCache::new();
        let ticket = cache.begin_refresh();
        assert!(cache.install(ticket, vec![user(1), user(2)], Vec::new()));
        assert_eq!(cache.snapshot().users.len(), 2);

        let ticket = cache.begin_refresh();
        assert!(cache.install(ticket, vec![user(3)], Vec::new()));
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.users[0].id, 3);
    }

    #[test]
    fn stale_response_is_discarded() {
        let cache = EntityCache::new();

        // Two refreshes start; the second resolves first.
        let older = cache.begin_refresh();
        let newer = cache.begin_refresh();
        assert!(cache.install(newer, vec![user(2)], Vec::new()));

        // The older fetch resolves late and must not clobber the newer
        // snapshot.
        assert!(!cache.install(older, vec![user(1)], Vec::new()));
        assert_eq!(cache.snapshot().users[0].id, 2);
    }

    #[test]
    fn clear_keeps_generation_ordering() {
        let cache = EntityCache::new();
        let old_ticket = cache.begin_refresh();
        let ticket = cache.begin_refresh();
        assert!(cache.install(ticket, vec![user(1)], Vec::new()));

        cache.clear();
        assert!(cache.snapshot().users.is_empty());

        // A refresh that started before the clear is still stale.
        assert!(!cache.install(old_ticket, vec![user(9)], Vec::new()));
    }
}

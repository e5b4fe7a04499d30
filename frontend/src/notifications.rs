// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{Duration, NaiveDateTime};
use parking_lot::RwLock;

/// Category of a feed entry, mirrored in the icon CSS class and the
/// filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Task,
    User,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Task => "task",
            NotificationKind::User => "user",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "task" => Some(NotificationKind::Task),
            "user" => Some(NotificationKind::User),
            "system" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

/// One entry in the notification feed.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u32,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

/// Page-local selection on the notifications page, parsed from the
/// `?filter=` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFilter {
    All,
    Unread,
    Kind(NotificationKind),
}

impl NotificationFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "unread" => NotificationFilter::Unread,
            other => NotificationKind::parse(other)
                .map(NotificationFilter::Kind)
                .unwrap_or(NotificationFilter::All),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFilter::All => "all",
            NotificationFilter::Unread => "unread",
            NotificationFilter::Kind(kind) => kind.as_str(),
        }
    }

    fn matches(&self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.read,
            NotificationFilter::Kind(kind) => notification.kind == *kind,
        }
    }
}

/// In-memory notification feed, process lifetime only. Seeded with demo
/// entries on startup; the upstream has no notification endpoint yet.
pub struct NotificationStore {
    inner: RwLock<Vec<Notification>>,
}

impl NotificationStore {
    /// An empty store. Mainly useful for tests.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// A store pre-populated with the demo feed, timestamped relative to
    /// `now`.
    pub fn seeded(now: NaiveDateTime) -> Self {
        let entry = |id, kind, minutes_ago: i64, message: &str| Notification {
            id,
            kind,
            message: message.to_string(),
            read: false,
            created_at: now - Duration::minutes(minutes_ago),
        };
        let mut entries = vec![
            entry(
                1,
                NotificationKind::Task,
                12,
                "Task \"Quarterly report\" was marked complete",
            ),
            entry(
                2,
                NotificationKind::User,
                45,
                "A new user joined the workspace",
            ),
            entry(
                3,
                NotificationKind::Task,
                120,
                "Task \"Deploy release\" is due tomorrow",
            ),
            entry(
                4,
                NotificationKind::System,
                360,
                "Scheduled maintenance this weekend",
            ),
            entry(
                5,
                NotificationKind::Task,
                1440,
                "3 tasks were reassigned",
            ),
        ];
        // The two oldest entries start out read.
        for notification in entries.iter_mut().skip(3) {
            notification.read = true;
        }
        Self {
            inner: RwLock::new(entries),
        }
    }

    /// Entries matching the filter, newest first.
    pub fn list(&self, filter: NotificationFilter) -> Vec<Notification> {
        let mut entries: Vec<Notification> = self
            .inner
            .read()
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    pub fn unread_count(&self) -> usize {
        self.inner.read().iter().filter(|n| !n.read).count()
    }

    /// Marks one entry read. Returns false when the id is unknown.
    pub fn mark_read(&self, id: u32) -> bool {
        let mut entries = self.inner.write();
        match entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Marks everything read, returning how many entries changed.
    pub fn mark_all_read(&self) -> usize {
        let mut entries = self.inner.write();
        let mut changed = 0;
        for notification in entries.iter_mut() {
            if !notification.read {
                notification.read = true;
                changed += 1;
            }
        }
        changed
    }

    /// Removes one entry. Returns false when the id is unknown.
    pub fn delete(&self, id: u32) -> bool {
        let mut entries = self.inner.write();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    /// Empties the feed.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn seeded_store_lists_newest_first() {
        let store = NotificationStore::seeded(now());
        let entries = store.list(NotificationFilter::All);
        assert_eq!(entries.len(), 5);
        for window in entries.windows(2) {
            assert!(window[0].created_at >= window[1].created_at);
        }
    }

    #[test]
    fn unread_filter_and_mark_all() {
        let store = NotificationStore::seeded(now());
        assert_eq!(store.unread_count(), 3);
        assert_eq!(store.list(NotificationFilter::Unread).len(), 3);

        let changed = store.mark_all_read();
        assert_eq!(changed, 3);
        assert_eq!(store.unread_count(), 0);
        assert!(store.list(NotificationFilter::Unread).is_empty());
    }

    #[test]
    fn kind_filter_selects_only_that_kind() {
        let store = NotificationStore::seeded(now());
        let tasks = store.list(NotificationFilter::Kind(NotificationKind::Task));
        assert!(!tasks.is_empty());
        assert!(tasks.iter().all(|n| n.kind == NotificationKind::Task));
    }

    #[test]
    fn mark_read_and_delete_report_unknown_ids() {
        let store = NotificationStore::seeded(now());
        assert!(store.mark_read(1));
        assert!(!store.mark_read(99));
        assert!(store.delete(1));
        assert!(!store.delete(1));

        store.clear();
        assert!(store.list(NotificationFilter::All).is_empty());
    }

    #[test]
    fn filter_parse_falls_back_to_all() {
        assert_eq!(NotificationFilter::parse("unread"), NotificationFilter::Unread);
        assert_eq!(
            NotificationFilter::parse("task"),
            NotificationFilter::Kind(NotificationKind::Task)
        );
        assert_eq!(NotificationFilter::parse("bogus"), NotificationFilter::All);
    }
}

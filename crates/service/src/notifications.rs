//! Transient, timed status messages.
//!
//! [`NotificationQueue`] is a cloneable handle; every clone sees the same
//! entries. Entries with `auto_close` are dismissed by a tokio timer after their
//! duration, and removing an entry early cancels that timer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_DURATION_MS: u64 = 3000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// What to show; unset fields take the queue defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close: Option<bool>,
}

impl NotificationOptions {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self { message: message.into(), severity, ..Self::default() }
    }

    pub fn duration(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn sticky(mut self) -> Self {
        self.auto_close = Some(false);
        self
    }
}

impl From<&str> for NotificationOptions {
    fn from(message: &str) -> Self { Self::new(message, Severity::Info) }
}

impl From<String> for NotificationOptions {
    fn from(message: String) -> Self { Self::new(message, Severity::Info) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub duration_ms: u64,
    pub auto_close: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Entries {
    items: Vec<Notification>,
    timers: HashMap<Uuid, JoinHandle<()>>,
}

#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Mutex<Entries>>,
    default_duration_ms: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self { Self::new(DEFAULT_DURATION_MS) }
}

impl NotificationQueue {
    pub fn new(default_duration_ms: u64) -> Self {
        Self { inner: Arc::new(Mutex::new(Entries::default())), default_duration_ms }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry and, for auto-closing ones, arm its dismiss timer.
    /// Outside a tokio runtime the entry stays until removed.
    pub fn show(&self, options: impl Into<NotificationOptions>) -> Uuid {
        let options = options.into();
        let notification = Notification {
            id: Uuid::new_v4(),
            message: options.message,
            title: options.title,
            severity: options.severity,
            duration_ms: options.duration_ms.unwrap_or(self.default_duration_ms),
            auto_close: options.auto_close.unwrap_or(true),
            created_at: Utc::now(),
        };
        let id = notification.id;
        debug!(%id, severity = ?notification.severity, "notification_shown");

        let mut entries = self.entries();
        if notification.auto_close {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let queue = self.clone();
                    let after = Duration::from_millis(notification.duration_ms);
                    let timer = handle.spawn(async move {
                        tokio::time::sleep(after).await;
                        queue.expire(id);
                    });
                    entries.timers.insert(id, timer);
                }
                Err(_) => warn!(%id, "no runtime, notification will not auto-close"),
            }
        }
        entries.items.push(notification);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationOptions::new(message, Severity::Success))
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationOptions::new(message, Severity::Error))
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationOptions::new(message, Severity::Warning))
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationOptions::new(message, Severity::Info))
    }

    /// Remove now and cancel the pending timer; returns whether the entry existed.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries();
        if let Some(timer) = entries.timers.remove(&id) {
            timer.abort();
        }
        let before = entries.items.len();
        entries.items.retain(|n| n.id != id);
        entries.items.len() != before
    }

    fn expire(&self, id: Uuid) {
        let mut entries = self.entries();
        entries.timers.remove(&id);
        entries.items.retain(|n| n.id != id);
    }

    pub fn clear(&self) {
        let mut entries = self.entries();
        for (_, timer) in entries.timers.drain() {
            timer.abort();
        }
        entries.items.clear();
    }

    /// Current entries in insertion order.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries().items.clone()
    }

    pub fn len(&self) -> usize { self.entries().items.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Number of armed dismiss timers.
    pub fn pending_timers(&self) -> usize { self.entries().timers.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn defaults_and_auto_dismiss() {
        let queue = NotificationQueue::default();
        let id = queue.show("Papel criado");
        let shown = queue.snapshot();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, id);
        assert_eq!(shown[0].severity, Severity::Info);
        assert_eq!(shown[0].duration_ms, 3000);
        assert!(shown[0].auto_close);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(queue.len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(queue.is_empty());
        assert_eq!(queue.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_remove_cancels_timer() {
        let queue = NotificationQueue::default();
        let first = queue.error("Erro ao salvar");
        let second = queue.success("Salvo");
        assert!(queue.remove(first));
        assert!(!queue.remove(first));
        assert_eq!(queue.pending_timers(), 1);
        assert_eq!(queue.snapshot().iter().map(|n| n.id).collect::<Vec<_>>(), vec![second]);
        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_entries_stay_until_cleared() {
        let queue = NotificationQueue::new(500);
        queue.show(NotificationOptions::new("Sessão expirada", Severity::Warning).sticky());
        queue.show(NotificationOptions::new("Carregando", Severity::Info).duration(100));
        tokio::time::sleep(Duration::from_secs(10)).await;
        let left = queue.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].message, "Sessão expirada");
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pending_timers(), 0);
    }

    #[test]
    fn ids_are_unique_and_order_is_kept() {
        let queue = NotificationQueue::default();
        let ids: Vec<Uuid> = (0..50).map(|i| queue.show(format!("msg {i}"))).collect();
        let shown: Vec<Uuid> = queue.snapshot().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, shown);
        let mut dedup = ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 50);
    }

    #[test]
    fn options_use_wire_names() {
        let o: NotificationOptions =
            serde_json::from_value(serde_json::json!({"message": "ok", "type": "success", "durationMs": 10})).unwrap();
        assert_eq!(o.severity, Severity::Success);
        assert_eq!(o.duration_ms, Some(10));
    }
}

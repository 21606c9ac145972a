//! The reactive diary store - single source of truth for diary entries.
//!
//! The store owns the canonical in-memory collection, keeps it sorted by
//! `created_at` descending, and broadcasts a fresh snapshot to every
//! subscriber after each mutation. Derived reads (by id, week filters,
//! emotion counts) are served from the snapshot without touching storage.
//!
//! Every operation serializes through one async mutex, held across the
//! operation's storage await: at most one mutation is in flight at a time,
//! a reload can never clobber a concurrent write, and subscribers observe
//! snapshots in the exact order state transitions are applied.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};

use crate::db::{DiaryRepository, WeeklySummary};
use crate::error::Result;
use crate::models::{DiaryEntry, DiaryId, DiaryImage, Emotion};
use crate::week;

/// The complete, sorted in-memory collection at a point in time.
pub type Snapshot = Arc<Vec<DiaryEntry>>;

/// Receiving half of a store subscription.
///
/// Yields the snapshot current at subscription time, then every subsequent
/// snapshot in mutation order. The queue is unbounded, so a slow subscriber
/// never misses or coalesces a transition.
pub type Subscription = mpsc::UnboundedReceiver<Snapshot>;

struct State {
    entries: Snapshot,
    subscribers: Vec<mpsc::UnboundedSender<Snapshot>>,
}

impl State {
    /// Replace the collection and deliver it to every live subscriber.
    fn publish(&mut self, entries: Vec<DiaryEntry>) {
        self.entries = Arc::new(entries);
        self.subscribers
            .retain(|subscriber| subscriber.send(Arc::clone(&self.entries)).is_ok());
    }
}

struct Inner<R> {
    repository: R,
    state: Mutex<State>,
}

/// Reactive store over a [`DiaryRepository`].
///
/// Explicitly constructed and handed to whichever components need it; clones
/// share one underlying store.
pub struct DiaryStore<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for DiaryStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: DiaryRepository> DiaryStore<R> {
    /// Create a store over the given repository with an empty snapshot.
    ///
    /// Call [`DiaryStore::reload`] to populate it from durable storage.
    pub fn new(repository: R) -> Self {
        Self {
            inner: Arc::new(Inner {
                repository,
                state: Mutex::new(State {
                    entries: Arc::new(Vec::new()),
                    subscribers: Vec::new(),
                }),
            }),
        }
    }

    /// Register a subscriber.
    ///
    /// The current snapshot is delivered immediately; every later snapshot
    /// follows in mutation order. Dropping the subscription unregisters it.
    pub async fn subscribe(&self) -> Subscription {
        let mut state = self.inner.state.lock().await;
        let (sender, receiver) = mpsc::unbounded_channel();
        sender.send(Arc::clone(&state.entries)).ok();
        state.subscribers.push(sender);
        receiver
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.inner.state.lock().await;
        Arc::clone(&state.entries)
    }

    /// Replace the snapshot with the full durable collection.
    ///
    /// Fail-soft: if the fetch fails the previous snapshot stays in place
    /// and nothing is broadcast.
    pub async fn reload(&self) {
        let mut state = self.inner.state.lock().await;
        self.reload_locked(&mut state).await;
    }

    async fn reload_locked(&self, state: &mut State) {
        match self.inner.repository.fetch_all().await {
            Ok(mut entries) => {
                sort_newest_first(&mut entries);
                state.publish(entries);
            }
            Err(error) => {
                tracing::warn!("Diary reload failed, keeping previous snapshot: {error}");
            }
        }
    }

    /// The entry with the given id, if present in the snapshot.
    pub async fn diary(&self, id: DiaryId) -> Option<DiaryEntry> {
        let state = self.inner.state.lock().await;
        state.entries.iter().find(|entry| entry.id == id).cloned()
    }

    /// Snapshot entries whose `created_at` falls in the week containing `date`.
    ///
    /// Preserves the snapshot's newest-first order.
    pub async fn diaries_in_week_of(&self, date: DateTime<Utc>) -> Vec<DiaryEntry> {
        let (start, end) = week::week_bounds(date);
        let state = self.inner.state.lock().await;
        state
            .entries
            .iter()
            .filter(|entry| (start..end).contains(&entry.created_at))
            .cloned()
            .collect()
    }

    /// Per-category entry counts for the week containing `date`.
    ///
    /// Only categories with at least one entry appear in the map.
    pub async fn count_by_emotion_in_week_of(
        &self,
        date: DateTime<Utc>,
    ) -> HashMap<Emotion, usize> {
        let mut counts = HashMap::new();
        for entry in self.diaries_in_week_of(date).await {
            *counts.entry(entry.emotion).or_insert(0) += 1;
        }
        counts
    }

    /// Weekday-grouped emotions for the week containing `date`.
    ///
    /// Delegates to the repository, which owns this bucketing shape.
    pub async fn fetch_weekly_summary(&self, date: DateTime<Utc>) -> Result<WeeklySummary> {
        self.inner.repository.fetch_weekly_summary(date).await
    }

    /// One representative image (or none) per stored diary id.
    pub async fn fetch_first_images(&self) -> Result<Vec<(Option<DiaryImage>, DiaryId)>> {
        self.inner.repository.fetch_first_images().await
    }

    /// Persist a new entry and, on success, merge it into the snapshot.
    ///
    /// Returns whether storage accepted the write. On rejection the snapshot
    /// is untouched and nothing is broadcast.
    pub async fn save(&self, entry: DiaryEntry) -> bool {
        let mut state = self.inner.state.lock().await;

        if let Err(error) = self.inner.repository.save(&entry).await {
            tracing::warn!("Diary save rejected by storage: {error}");
            return false;
        }

        let mut entries = state.entries.as_ref().clone();
        entries.push(entry);
        sort_newest_first(&mut entries);
        state.publish(entries);
        true
    }

    /// Persist a replacement for an existing entry keyed by its id.
    ///
    /// On success the in-memory entry is replaced in place and the snapshot
    /// re-sorted. If the id is missing from the snapshot, the in-memory view
    /// is stale relative to storage; a full reload restores consistency
    /// instead of a partial patch.
    pub async fn update(&self, entry: DiaryEntry) -> bool {
        let mut state = self.inner.state.lock().await;

        if let Err(error) = self.inner.repository.update(&entry).await {
            tracing::warn!("Diary update rejected by storage: {error}");
            return false;
        }

        let position = state.entries.iter().position(|e| e.id == entry.id);
        match position {
            Some(index) => {
                let mut entries = state.entries.as_ref().clone();
                entries[index] = entry;
                sort_newest_first(&mut entries);
                state.publish(entries);
            }
            None => {
                tracing::debug!(
                    "Updated diary {} is missing from the snapshot, reloading",
                    entry.id
                );
                self.reload_locked(&mut state).await;
            }
        }
        true
    }

    /// Delete an entry by id and, on success, drop it from the snapshot.
    pub async fn delete(&self, id: DiaryId) -> bool {
        let mut state = self.inner.state.lock().await;

        if let Err(error) = self.inner.repository.delete(&id).await {
            tracing::warn!("Diary delete rejected by storage: {error}");
            return false;
        }

        let mut entries = state.entries.as_ref().clone();
        entries.retain(|entry| entry.id != id);
        state.publish(entries);
        true
    }
}

fn sort_newest_first(entries: &mut [DiaryEntry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

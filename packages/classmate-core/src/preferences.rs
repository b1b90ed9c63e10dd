//! # Debounced Preference Synchronizer
//!
//! Collapses bursts of local preference edits into one remote update.
//!
//! ## State Machine
//!
//! ```text
//!                 mutation
//!        ┌──────────────────────────┐
//!        │                          ▼
//!   ┌─────────┐               ┌──────────────┐  mutation
//!   │  Idle   │               │ PendingFlush │◄──────────┐
//!   └─────────┘               └──────┬───────┘  (restart │
//!        ▲                           │           timer)  │
//!        │                           │───────────────────┘
//!        │                           │ quiet period elapsed
//!        │                           ▼ → update_user_preferences(latest set)
//!        │   response,        ┌──────────────┐
//!        └────────────────────│   Flushing   │── mutation ──► PendingFlush
//!            no new edits     └──────────────┘
//! ```
//!
//! A set loaded from the backend only replaces the local one while `Idle`
//! and only if no edit happened since it was requested (see
//! [`PreferenceSynchronizer::revision`]). Unsaved or in-flight local edits
//! always win over a stored copy.
//!
//! The timer runs in a task owned by the synchronizer. Dropping the
//! synchronizer (or calling [`PreferenceSynchronizer::shutdown`]) aborts
//! the task, so a flush still pending at teardown is discarded. Use
//! [`PreferenceSynchronizer::flush_now`] first to keep it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::api::NotificationPreferenceApi;
use crate::error::{Error, Result};
use crate::events::{ClientEvent, EventBus};
use crate::model::{PreferenceKind, PreferenceSet, UserId};

/// Synchronizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing waiting to be saved
    Idle,
    /// Local edits waiting for the quiet period to elapse
    PendingFlush,
    /// An update is on its way to the backend
    Flushing,
}

enum Command {
    Touch,
    FlushNow(oneshot::Sender<Result<()>>),
}

struct Shared {
    user_id: UserId,
    preferences: Mutex<PreferenceSet>,
    state: Mutex<SyncState>,
    revision: AtomicU64,
    api: Arc<dyn NotificationPreferenceApi>,
    events: EventBus,
}

impl Shared {
    /// Send the latest set. Last write wins.
    async fn flush(&self) -> Result<()> {
        let snapshot = {
            let prefs = self.preferences.lock();
            *self.state.lock() = SyncState::Flushing;
            *prefs
        };

        tracing::debug!(user_id = self.user_id, ?snapshot, "Flushing preferences");

        let result = self.api.update_user_preferences(self.user_id, &snapshot).await;
        {
            // Edits made while in flight keep their PendingFlush
            let mut state = self.state.lock();
            if *state == SyncState::Flushing {
                *state = SyncState::Idle;
            }
        }

        match result {
            Ok(()) => {
                tracing::info!(user_id = self.user_id, "Preferences updated");
                self.events.emit(ClientEvent::PreferencesSaved {
                    user_id: self.user_id,
                    preferences: snapshot,
                });
                Ok(())
            }
            Err(e) => {
                self.events
                    .report_failure("update_user_preferences", e.clone());
                Err(e)
            }
        }
    }
}

/// Owns a user's [`PreferenceSet`] and saves it after edits settle.
///
/// Must be created inside a tokio runtime.
pub struct PreferenceSynchronizer {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<()>>,
}

impl PreferenceSynchronizer {
    /// Start a synchronizer for `user_id` with the given quiet period.
    pub fn new(
        user_id: UserId,
        initial: PreferenceSet,
        quiet_period: Duration,
        api: Arc<dyn NotificationPreferenceApi>,
        events: EventBus,
    ) -> Self {
        let shared = Arc::new(Shared {
            user_id,
            preferences: Mutex::new(initial),
            state: Mutex::new(SyncState::Idle),
            revision: AtomicU64::new(0),
            api,
            events,
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(shared.clone(), rx, quiet_period));

        Self {
            shared,
            tx,
            task: Some(task),
        }
    }

    /// Whose preferences these are.
    pub fn user_id(&self) -> UserId {
        self.shared.user_id
    }

    /// Current in-memory set.
    pub fn current(&self) -> PreferenceSet {
        *self.shared.preferences.lock()
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        *self.shared.state.lock()
    }

    /// Number of local edits so far. Capture it before requesting the
    /// stored set and pass it to [`load_since`](Self::load_since).
    pub fn revision(&self) -> u64 {
        self.shared.revision.load(Ordering::SeqCst)
    }

    /// Replace the set with one loaded from the backend. Does not schedule
    /// a save.
    ///
    /// Refused, returning `false`, while an edit is pending or in flight.
    pub fn load(&self, preferences: PreferenceSet) -> bool {
        self.load_since(preferences, self.revision())
    }

    /// Like [`load`](Self::load), but also refused when any edit happened
    /// after `revision` was captured.
    pub fn load_since(&self, preferences: PreferenceSet, revision: u64) -> bool {
        let mut current = self.shared.preferences.lock();
        let state = *self.shared.state.lock();
        if state != SyncState::Idle || self.revision() != revision {
            tracing::debug!(
                user_id = self.shared.user_id,
                ?state,
                "Keeping local preferences over stored copy"
            );
            return false;
        }
        *current = preferences;
        true
    }

    /// Toggle one flag and schedule a save.
    pub fn set(&self, kind: PreferenceKind, enabled: bool) {
        self.update(|p| p.set(kind, enabled));
    }

    /// Replace the whole set and schedule a save.
    pub fn replace(&self, preferences: PreferenceSet) {
        self.update(|p| *p = preferences);
    }

    /// Apply an arbitrary edit and schedule a save.
    pub fn update(&self, edit: impl FnOnce(&mut PreferenceSet)) {
        {
            let mut prefs = self.shared.preferences.lock();
            edit(&mut prefs);
            self.shared.revision.fetch_add(1, Ordering::SeqCst);
            *self.shared.state.lock() = SyncState::PendingFlush;
        }
        tracing::debug!(user_id = self.shared.user_id, "Preference edit queued");
        // Fails only after shutdown, when edits are no longer saved anyway
        let _ = self.tx.send(Command::Touch);
    }

    /// Cancel the quiet period and save the latest set now.
    pub async fn flush_now(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::FlushNow(reply_tx))
            .map_err(|_| Error::Internal("preference synchronizer stopped".into()))?;
        reply_rx
            .await
            .map_err(|_| Error::Internal("preference synchronizer stopped".into()))?
    }

    /// Stop the timer task. A pending flush is discarded.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            if *self.shared.state.lock() == SyncState::PendingFlush {
                tracing::debug!(
                    user_id = self.shared.user_id,
                    "Discarding pending preference flush"
                );
            }
            task.abort();
        }
    }
}

impl Drop for PreferenceSynchronizer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(shared: Arc<Shared>, mut rx: mpsc::UnboundedReceiver<Command>, quiet: Duration) {
    // Idle: wait for the first edit
    while let Some(cmd) = rx.recv().await {
        if let Command::FlushNow(reply) = cmd {
            let _ = reply.send(shared.flush().await);
            continue;
        }

        // PendingFlush: every further edit restarts the timer
        loop {
            tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(Command::Touch) => continue,
                    Some(Command::FlushNow(reply)) => {
                        let _ = reply.send(shared.flush().await);
                        break;
                    }
                    None => return,
                },
                _ = tokio::time::sleep(quiet) => {
                    let _ = shared.flush().await;
                    break;
                }
            }
        }
    }
}

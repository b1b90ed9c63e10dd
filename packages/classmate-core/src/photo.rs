//! # Photo Resource Loader
//!
//! Fetches profile photos and hands them out as owned local handles.
//!
//! ## Handle Lifetime
//!
//! ```text
//! ┌──────────────┐  load(id)   ┌─────────────┐  install   ┌───────────┐
//! │ PhotoLoader  │────────────►│ PhotoHandle │───────────►│ PhotoSlot │
//! └──────────────┘             └──────┬──────┘            └─────┬─────┘
//!                                     │ registers                │ replaces → old handle dropped
//!                                     ▼                          │ dropped  → last handle dropped
//!                              ┌────────────────┐                │
//!                              │ HandleRegistry │◄───────────────┘ released on drop
//!                              └────────────────┘
//! ```
//!
//! Each handle is registered while alive and released when dropped, so a
//! view that only ever keeps its handles in a [`PhotoSlot`] cannot
//! accumulate unreleased image data across navigations.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::api::UserProfileApi;
use crate::error::{Error, Result};
use crate::events::{ClientEvent, EventBus};
use crate::model::PhotoId;

/// Tracks which photo handles are still alive.
///
/// Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl HandleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles not yet released.
    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Whether a handle is still alive.
    pub fn is_live(&self, id: &Uuid) -> bool {
        self.live.lock().contains(id)
    }

    fn register(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.live.lock().insert(id);
        id
    }

    fn release(&self, id: &Uuid) {
        self.live.lock().remove(id);
    }
}

/// Locally addressable image data.
///
/// Released from its registry when dropped.
#[derive(Debug)]
pub struct PhotoHandle {
    id: Uuid,
    photo_id: PhotoId,
    data: Bytes,
    registry: HandleRegistry,
}

impl PhotoHandle {
    /// Local handle id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Backend photo id.
    pub fn photo_id(&self) -> PhotoId {
        self.photo_id
    }

    /// Image bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Size of the image data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Address a UI shell can bind to while the handle is alive.
    pub fn local_url(&self) -> String {
        format!("blob:classmate/{}", self.id)
    }
}

impl Drop for PhotoHandle {
    fn drop(&mut self) {
        tracing::trace!(handle = %self.id, photo_id = self.photo_id, "Releasing photo handle");
        self.registry.release(&self.id);
    }
}

/// Holds the one photo a view is currently showing.
#[derive(Debug, Default)]
pub struct PhotoSlot {
    current: Option<PhotoHandle>,
}

impl PhotoSlot {
    /// Empty slot. The view keeps rendering its default image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `handle`, releasing whatever it supersedes.
    pub fn install(&mut self, handle: PhotoHandle) {
        self.current = Some(handle);
    }

    /// Handle being shown, if any.
    pub fn current(&self) -> Option<&PhotoHandle> {
        self.current.as_ref()
    }

    /// Release the shown handle and fall back to the default image.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Fetches photo bytes and wraps them in registered handles.
#[derive(Clone)]
pub struct PhotoLoader {
    api: Arc<dyn UserProfileApi>,
    registry: HandleRegistry,
    events: EventBus,
}

impl PhotoLoader {
    /// Create a loader over the user-profile service.
    pub fn new(api: Arc<dyn UserProfileApi>, registry: HandleRegistry, events: EventBus) -> Self {
        Self {
            api,
            registry,
            events,
        }
    }

    /// Registry the loader's handles are tracked in.
    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Fetch a photo.
    ///
    /// An empty body counts as a missing photo. Failures are logged and
    /// published; the caller keeps whatever it was showing.
    pub async fn load(&self, photo_id: PhotoId) -> Result<PhotoHandle> {
        self.fetch(photo_id).await.map_err(|e| {
            self.events.report_failure("get_user_profile_photo", e.clone());
            e
        })
    }

    /// Like [`load`](Self::load), but leaves failure reporting to the
    /// caller.
    pub async fn fetch(&self, photo_id: PhotoId) -> Result<PhotoHandle> {
        let data = self.api.get_user_profile_photo(photo_id).await?;
        if data.is_empty() {
            return Err(Error::NotFound(format!("photo {} has no data", photo_id)));
        }

        let size = data.len();
        let handle = PhotoHandle {
            id: self.registry.register(),
            photo_id,
            data,
            registry: self.registry.clone(),
        };
        tracing::debug!(photo_id, size, handle = %handle.id, "Photo loaded");
        self.events.emit(ClientEvent::PhotoLoaded { photo_id, size });
        Ok(handle)
    }

    /// Failure report for a fetch whose result is still wanted.
    pub fn report_failure(&self, error: Error) {
        self.events.report_failure("get_user_profile_photo", error);
    }
}

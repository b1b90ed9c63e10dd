//! # Profile Page View
//!
//! Shows one user's profile, photo and authored posts, and owns the
//! signed-in user's notification preferences.
//!
//! ## Navigation
//!
//! ```text
//! open(7) ──► generation 1 ──┬─ get_user_profile(7) ─► get_user_profile_photo
//!                            ├─ get_posts_by_author(7)
//!                            └─ get_user_preferences(me)
//! open(9) ──► generation 2 ──┬─ ...
//!                            │
//!   late responses tagged with generation 1 are dropped
//! ```
//!
//! In-flight requests are not cancelled on navigation; their results are
//! discarded when they arrive.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::{NotificationPreferenceApi, PostApi, UserProfileApi};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::events::EventBus;
use crate::model::{Post, PreferenceKind, PreferenceSet, UserId, UserProfile};
use crate::photo::{PhotoLoader, PhotoSlot};
use crate::preferences::PreferenceSynchronizer;

/// Services the profile page talks to.
#[derive(Clone)]
pub struct ProfileServices {
    /// Profile and photo lookups
    pub profiles: Arc<dyn UserProfileApi>,
    /// Authored posts
    pub posts: Arc<dyn PostApi>,
    /// Preference storage
    pub preferences: Arc<dyn NotificationPreferenceApi>,
}

impl ProfileServices {
    /// Use one backend for every service.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserProfileApi + PostApi + NotificationPreferenceApi + 'static,
    {
        Self {
            profiles: backend.clone(),
            posts: backend.clone(),
            preferences: backend,
        }
    }
}

#[derive(Default)]
struct PageState {
    generation: u64,
    user_id: Option<UserId>,
    profile: Option<UserProfile>,
    photo: PhotoSlot,
    posts: Vec<Post>,
}

/// View-model for the profile page.
pub struct ProfilePageView {
    logged_user_id: UserId,
    services: ProfileServices,
    photos: PhotoLoader,
    events: EventBus,
    state: Mutex<PageState>,
    preferences: PreferenceSynchronizer,
}

impl ProfilePageView {
    /// Create the page for the signed-in user. Must be called inside a tokio
    /// runtime.
    pub fn new(
        logged_user_id: UserId,
        services: ProfileServices,
        photos: PhotoLoader,
        config: &ClientConfig,
        events: EventBus,
    ) -> Self {
        let preferences = PreferenceSynchronizer::new(
            logged_user_id,
            PreferenceSet::default(),
            config.preference_debounce,
            services.preferences.clone(),
            events.clone(),
        );

        Self {
            logged_user_id,
            services,
            photos,
            events,
            state: Mutex::new(PageState::default()),
            preferences,
        }
    }

    /// Show `user_id`'s profile. Called on first render and on every route
    /// change.
    pub async fn open(&self, user_id: UserId) {
        let generation = {
            let mut state = self.state.lock();
            let generation = state.generation + 1;
            *state = PageState {
                generation,
                user_id: Some(user_id),
                ..PageState::default()
            };
            generation
        };

        tracing::debug!(user_id, generation, "Opening profile page");

        futures::join!(
            self.load_profile(generation, user_id),
            self.load_posts(generation, user_id),
            self.load_preferences(generation),
        );
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    /// Publish a failure unless the page has moved on.
    fn report_current(&self, generation: u64, operation: &'static str, error: Error) {
        if self.is_current(generation) {
            self.events.report_failure(operation, error);
        } else {
            tracing::debug!(operation, generation, "Dropping stale failure");
        }
    }

    async fn load_profile(&self, generation: u64, user_id: UserId) {
        let profile = match self.services.profiles.get_user_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => return self.report_current(generation, "get_user_profile", e),
        };

        let photo_id = profile.photo_id();
        {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::debug!(user_id, generation, "Dropping stale profile response");
                return;
            }
            state.profile = Some(profile);
        }

        let Some(photo_id) = photo_id else {
            return;
        };
        match self.photos.fetch(photo_id).await {
            Ok(handle) => {
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.photo.install(handle);
                }
            }
            Err(e) => {
                if self.is_current(generation) {
                    self.photos.report_failure(e);
                }
            }
        }
    }

    async fn load_posts(&self, generation: u64, user_id: UserId) {
        match self.services.posts.get_posts_by_author(user_id).await {
            Ok(posts) => {
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.posts = posts;
                } else {
                    tracing::debug!(user_id, generation, "Dropping stale posts response");
                }
            }
            Err(e) => self.report_current(generation, "get_posts_by_author", e),
        }
    }

    async fn load_preferences(&self, generation: u64) {
        let requested_at = self.preferences.revision();
        match self
            .services
            .preferences
            .get_user_preferences(self.logged_user_id)
            .await
        {
            Ok(stored) => {
                let state = self.state.lock();
                if state.generation == generation {
                    // Refused while local edits are unsaved or in flight
                    self.preferences.load_since(stored, requested_at);
                }
            }
            Err(e) => self.report_current(generation, "get_user_preferences", e),
        }
    }

    /// The signed-in user.
    pub fn logged_user_id(&self) -> UserId {
        self.logged_user_id
    }

    /// The user whose page is showing.
    pub fn user_id(&self) -> Option<UserId> {
        self.state.lock().user_id
    }

    /// Loaded profile, if any.
    pub fn profile(&self) -> Option<UserProfile> {
        self.state.lock().profile.clone()
    }

    /// Local address of the profile photo, if loaded.
    pub fn photo_url(&self) -> Option<String> {
        self.state.lock().photo.current().map(|h| h.local_url())
    }

    /// Posts authored by the shown user.
    pub fn posts(&self) -> Vec<Post> {
        self.state.lock().posts.clone()
    }

    /// Whether the page shows the signed-in user. Edit controls render only
    /// then.
    pub fn is_own_profile(&self) -> bool {
        self.user_id() == Some(self.logged_user_id)
    }

    /// Current preference set.
    pub fn preferences(&self) -> PreferenceSet {
        self.preferences.current()
    }

    /// The synchronizer saving the preferences.
    pub fn preference_sync(&self) -> &PreferenceSynchronizer {
        &self.preferences
    }

    /// Toggle one notification kind.
    pub fn set_preference(&self, kind: PreferenceKind, enabled: bool) {
        self.preferences.set(kind, enabled);
    }

    /// Replace the whole preference set.
    pub fn update_preferences(&self, preferences: PreferenceSet) {
        self.preferences.replace(preferences);
    }

    /// Route to the edit form for the shown user.
    pub fn navigate_to_edit_profile(&self) -> Option<String> {
        self.user_id().map(|id| format!("profile/{}/edit", id))
    }

    /// Route to the shown user's notification settings.
    pub fn navigate_to_notification_preferences(&self) -> Option<String> {
        self.user_id()
            .map(|id| format!("profile/{}/notification-preferences", id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::events::ClientEvent;
    use crate::photo::HandleRegistry;
    use crate::testing::{Call, FakeBackend};

    const ME: UserId = 1;

    fn page(backend: FakeBackend, events: EventBus) -> (Arc<FakeBackend>, ProfilePageView) {
        let backend = Arc::new(backend);
        let photos = PhotoLoader::new(backend.clone(), HandleRegistry::new(), events.clone());
        let view = ProfilePageView::new(
            ME,
            ProfileServices::from_backend(backend.clone()),
            photos,
            &ClientConfig::default(),
            events,
        );
        (backend, view)
    }

    #[tokio::test]
    async fn test_open_loads_profile_photo_posts_and_preferences() {
        let stored = PreferenceSet {
            like_notification_enabled: true,
            ..PreferenceSet::default()
        };
        let (backend, view) = page(
            FakeBackend::new()
                .with_profile(2, Some(40))
                .with_photo(40, b"png")
                .with_post(1, "Apuntes de álgebra", 2, 5)
                .with_preferences(ME, stored),
            EventBus::default(),
        );

        view.open(2).await;

        assert_eq!(view.profile().unwrap().user_id, 2);
        assert!(view.photo_url().is_some());
        assert_eq!(view.posts().len(), 1);
        assert_eq!(view.preferences(), stored);
        assert!(!view.is_own_profile());
        assert!(backend.calls().contains(&Call::GetPreferences(ME)));
    }

    #[tokio::test]
    async fn test_own_profile_and_routes() {
        let (_, view) = page(FakeBackend::new().with_profile(ME, None), EventBus::default());
        assert_eq!(view.navigate_to_edit_profile(), None);

        view.open(ME).await;

        assert!(view.is_own_profile());
        assert_eq!(view.navigate_to_edit_profile().as_deref(), Some("profile/1/edit"));
        assert_eq!(
            view.navigate_to_notification_preferences().as_deref(),
            Some("profile/1/notification-preferences")
        );
    }

    #[tokio::test]
    async fn test_missing_profile_is_reported() {
        let events = EventBus::new(8);
        let mut rx = events.subscribe();
        let (_, view) = page(FakeBackend::new(), events);

        view.open(404).await;

        assert!(view.profile().is_none());
        assert!(matches!(
            rx.recv().await.unwrap(),
            ClientEvent::OperationFailed {
                operation: "get_user_profile",
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_profile_response_is_dropped() {
        let (_, view) = page(
            FakeBackend::new()
                .with_profile(2, None)
                .with_profile(3, None)
                .with_post(10, "Old", 2, 1)
                .with_profile_delay(2, Duration::from_secs(1)),
            EventBus::default(),
        );

        futures::join!(view.open(2), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            view.open(3).await;
        });

        assert_eq!(view.user_id(), Some(3));
        assert_eq!(view.profile().unwrap().user_id, 3);
        assert!(view.posts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_preference_edits_are_debounced() {
        let (backend, view) = page(FakeBackend::new().with_profile(ME, None), EventBus::default());
        view.open(ME).await;

        view.set_preference(PreferenceKind::Comment, true);
        view.set_preference(PreferenceKind::Message, true);
        tokio::time::sleep(Duration::from_millis(400)).await;

        let updates = backend.preference_updates();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].comment_notification_enabled);
        assert!(updates[0].message_notification_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_edits_survive_reopen() {
        let (_, view) = page(FakeBackend::new().with_profile(ME, None), EventBus::default());

        view.update_preferences(PreferenceSet {
            event_notification_enabled: true,
            ..PreferenceSet::default()
        });
        view.open(ME).await;

        assert!(view.preferences().event_notification_enabled);
    }

    #[tokio::test]
    async fn test_navigation_releases_previous_photo() {
        let (_, view) = page(
            FakeBackend::new()
                .with_profile(2, Some(20))
                .with_profile(3, Some(30))
                .with_photo(20, b"a")
                .with_photo(30, b"b"),
            EventBus::default(),
        );

        view.open(2).await;
        view.open(3).await;

        assert_eq!(view.photos.registry().live_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_during_flush_keeps_local_edit() {
        let (backend, view) = page(
            FakeBackend::new()
                .with_profile(ME, None)
                .with_preference_update_delay(Duration::from_secs(1)),
            EventBus::default(),
        );
        view.open(ME).await;

        view.set_preference(PreferenceKind::Comment, true);
        tokio::time::sleep(Duration::from_millis(200)).await;
        view.open(ME).await;

        assert!(view.preferences().comment_notification_enabled);

        tokio::time::sleep(Duration::from_secs(2)).await;
        view.open(ME).await;
        assert!(view.preferences().comment_notification_enabled);
        assert_eq!(backend.preference_updates().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stored_copy_requested_before_edit_is_ignored() {
        let (_, view) = page(
            FakeBackend::new()
                .with_profile(ME, None)
                .with_preference_fetch_delay(Duration::from_secs(1)),
            EventBus::default(),
        );

        futures::join!(view.open(ME), async {
            view.set_preference(PreferenceKind::Like, true);
            tokio_test::assert_ok!(view.preference_sync().flush_now().await);
        });

        assert!(view.preferences().like_notification_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_failures_are_not_reported() {
        let events = EventBus::new(16);
        let mut rx = events.subscribe();
        let (_, view) = page(
            FakeBackend::new()
                .with_profile(2, Some(404))
                .with_profile(3, None)
                .with_photo_delay(404, Duration::from_secs(1))
                .with_preference_fetch_delay(Duration::from_secs(1))
                .failing("get_user_preferences"),
            events,
        );

        futures::join!(view.open(2), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            view.open(3).await;
        });

        let mut failures = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ClientEvent::OperationFailed { operation, .. } = event {
                failures.push(operation);
            }
        }
        // Only the current page's preference fetch is reported
        assert_eq!(failures, vec!["get_user_preferences"]);
        assert!(view.photo_url().is_none());
    }
}

//! # ClassMate Client Core
//!
//! View logic for the ClassMate forum application, independent of any UI
//! toolkit: who may moderate whom, debounced saving of notification
//! preferences, and profile photo loading with explicit handle ownership.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CLASSMATE CLIENT CORE                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────┐   ┌─────────────────┐   ┌──────────────────┐          │
//! │  │ UserItemView │   │ ProfilePageView │   │  PostSearchView  │  views   │
//! │  └──────┬───────┘   └────────┬────────┘   └────────┬─────────┘          │
//! │         │                    │                     │                    │
//! │  ┌──────▼───────┐   ┌────────▼────────┐            │                    │
//! │  │  moderation  │   │   preferences   │            │                    │
//! │  │ - roles      │   │ - debounce task │            │                    │
//! │  │ - ban/promote│   └────────┬────────┘            │                    │
//! │  └──────┬───────┘            │      ┌──────────┐   │                    │
//! │         │                    │      │  photo   │   │                    │
//! │         │                    │      │ - slots  │   │                    │
//! │         │                    │      └────┬─────┘   │                    │
//! │         └────────────────────┴───────────┴─────────┘                    │
//! │                                   │                                     │
//! │                  ┌────────────────▼────────────────┐    ┌────────────┐  │
//! │                  │   api traits  ──►  HttpBackend  │    │  EventBus  │  │
//! │                  └─────────────────────────────────┘    └────────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type and codes
//! - [`config`] - Client configuration
//! - [`model`] - Wire types
//! - [`api`] - Backend service traits and the HTTP implementation
//! - [`events`] - Broadcast of client events and swallowed failures
//! - [`moderation`] - Role resolver and ban/promote actions
//! - [`preferences`] - Debounced preference synchronizer
//! - [`photo`] - Photo loader and handle ownership
//! - [`views`] - View-models for the member list, profile and search pages

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod moderation;
pub mod photo;
pub mod preferences;
pub mod views;

#[cfg(test)]
mod testing;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use api::HttpBackend;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use events::{ClientEvent, EventBus};

// ============================================================================
// CLIENT
// ============================================================================

use std::sync::Arc;

use model::{PreferenceSet, UserId};
use moderation::ForumModerator;
use photo::{HandleRegistry, PhotoLoader};
use preferences::PreferenceSynchronizer;
use views::{PostSearchView, ProfilePageView, ProfileServices};

/// Wires the HTTP backend, the event bus and the photo registry together
/// and hands out view-models sharing them.
///
/// ## Example
///
/// ```ignore
/// use classmate_core::{ClassMateClient, ClientConfig};
///
/// let client = ClassMateClient::new(ClientConfig::from_env())?;
/// let page = client.profile_page(logged_user_id);
/// page.open(viewed_user_id).await;
/// ```
#[derive(Clone)]
pub struct ClassMateClient {
    config: ClientConfig,
    backend: Arc<HttpBackend>,
    events: EventBus,
    photos: HandleRegistry,
}

impl ClassMateClient {
    /// Validate `config` and build the HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = Arc::new(HttpBackend::new(&config)?);
        let events = EventBus::new(config.event_capacity);

        tracing::info!(
            base_url = %config.base_url,
            "ClassMate client v{} ready",
            env!("CARGO_PKG_VERSION")
        );

        Ok(Self {
            config,
            backend,
            events,
            photos: HandleRegistry::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The HTTP backend, for direct service calls.
    pub fn backend(&self) -> Arc<HttpBackend> {
        self.backend.clone()
    }

    /// Event bus shared by every view-model from this client.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Registry of live photo handles.
    pub fn photo_registry(&self) -> &HandleRegistry {
        &self.photos
    }

    /// Ban/promote actions.
    pub fn moderator(&self) -> ForumModerator {
        ForumModerator::new(self.backend.clone(), self.events.clone())
    }

    /// Photo loader.
    pub fn photo_loader(&self) -> PhotoLoader {
        PhotoLoader::new(self.backend.clone(), self.photos.clone(), self.events.clone())
    }

    /// A standalone preference synchronizer. Needs a tokio runtime.
    pub fn preference_synchronizer(
        &self,
        user_id: UserId,
        initial: PreferenceSet,
    ) -> PreferenceSynchronizer {
        PreferenceSynchronizer::new(
            user_id,
            initial,
            self.config.preference_debounce,
            self.backend.clone(),
            self.events.clone(),
        )
    }

    /// Profile page for the signed-in user. Needs a tokio runtime.
    pub fn profile_page(&self, logged_user_id: UserId) -> ProfilePageView {
        ProfilePageView::new(
            logged_user_id,
            ProfileServices::from_backend(self.backend.clone()),
            self.photo_loader(),
            &self.config,
            self.events.clone(),
        )
    }

    /// Post search results page.
    pub fn post_search(&self) -> PostSearchView {
        PostSearchView::new(self.backend.clone(), self.events.clone())
    }
}

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of the client core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

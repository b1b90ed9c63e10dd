//! Post search results.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::PostApi;
use crate::events::EventBus;
use crate::model::{ForumId, Post};

/// Which backend query a search runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Every forum
    AllForums,
    /// One forum
    Forum(ForumId),
}

impl SearchScope {
    /// A missing or zero forum id searches every forum.
    pub fn from_forum_id(forum_id: Option<ForumId>) -> Self {
        match forum_id {
            Some(id) if id != 0 => Self::Forum(id),
            _ => Self::AllForums,
        }
    }
}

#[derive(Default)]
struct SearchState {
    generation: u64,
    results: Vec<Post>,
}

/// View-model for the search results page.
pub struct PostSearchView {
    posts: Arc<dyn PostApi>,
    events: EventBus,
    state: Mutex<SearchState>,
}

impl PostSearchView {
    /// Create an empty results page.
    pub fn new(posts: Arc<dyn PostApi>, events: EventBus) -> Self {
        Self {
            posts,
            events,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Run a search from the route's query parameters.
    ///
    /// On failure the previous results stay. A search superseded by a newer
    /// one before its response arrives is ignored.
    pub async fn search(&self, query: Option<&str>, forum_id: Option<ForumId>) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.generation
        };
        let query = query.unwrap_or_default();
        let scope = SearchScope::from_forum_id(forum_id);

        tracing::debug!(query, ?scope, generation, "Searching posts");

        let result = match scope {
            SearchScope::Forum(forum_id) => {
                self.posts
                    .get_posts_by_name_and_forum_id(query, forum_id)
                    .await
            }
            SearchScope::AllForums => self.posts.get_posts_by_name(query).await,
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(query, generation, "Dropping superseded search response");
            return;
        }

        match result {
            Ok(posts) => {
                tracing::debug!(query, count = posts.len(), "Search results");
                state.results = posts;
            }
            Err(e) => {
                drop(state);
                self.events.report_failure("search_posts", e);
            }
        }
    }

    /// Results currently shown.
    pub fn results(&self) -> Vec<Post> {
        self.state.lock().results.clone()
    }
}

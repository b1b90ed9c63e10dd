//! # View-Models
//!
//! UI-independent state behind the forum member list, the profile page and
//! the post search page. A UI shell renders from these and forwards user
//! input to them; every remote call goes through the traits in
//! [`crate::api`].
//!
//! | View | Backing services |
//! |------|------------------|
//! | [`UserItemView`] | `ForumApi`, `UserProfileApi` |
//! | [`ProfilePageView`] | `UserProfileApi`, `PostApi`, `NotificationPreferenceApi` |
//! | [`PostSearchView`] | `PostApi` |

mod dropdown;
mod profile;
mod search;
mod user_item;

pub use dropdown::{DropdownGroup, DropdownHandle, DropdownId};
pub use profile::{ProfilePageView, ProfileServices};
pub use search::{PostSearchView, SearchScope};
pub use user_item::{ForumContext, UserItemView};

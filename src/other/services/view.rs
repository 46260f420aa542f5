//! What the profile screen renders.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use repositories::FetchFailure;
use types::{Handle, UserId, entities::user::ProfileRecord};

pub static DEFAULT_COVER: &str = "/cover.png";
pub static DEFAULT_AVATAR: &str = "/avatar-placeholder.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// First load of a handle, or any reload of it.
  Loading,
  NotFound,
  Failed(FetchFailure),
  Loaded(Box<ProfileView>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedSelector {
  #[default]
  Posts,
  Likes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowControl {
  Follow,
  Unfollow,
  Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitControl {
  Update,
  Updating,
}

/// Parameters handed to the feed listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
  pub feed: FeedSelector,
  pub handle: Handle,
  pub profile_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
  pub profile: Arc<ProfileRecord>,
  pub cover_src: String,
  pub avatar_src: String,
  pub link: Option<String>,
  pub member_since: String,
  pub following_count: usize,
  pub followers_count: usize,
  /// Cover and avatar edit buttons, plus the edit-profile control.
  pub can_edit: bool,
  /// Never present on one's own profile.
  pub follow: Option<FollowControl>,
  /// Only present while something is staged.
  pub commit: Option<CommitControl>,
  pub feed: FeedSelector,
}

/// E.g. "Joined July 2024".
#[must_use]
pub fn member_since(created_at: DateTime<Utc>) -> String {
  format!("Joined {}", created_at.format("%B %Y"))
}

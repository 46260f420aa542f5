//! The profile screen: the routed handle, the viewer, the viewed profile and the
//! local edit buffer, composed into a single [`Screen`].

use std::sync::Arc;

use api::Backend;
use repositories::{
  identity::IdentityCache,
  profile::{ProfileFetcher, ProfileState},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{Level, event};
use types::{Handle, entities::user::ProfileRecord};

use crate::{
  edit_buffer::{EditBuffer, MediaSlot, StagedImage},
  mutations::{MutationCoordinator, MutationOutcome, Precondition},
  notify::Notifier,
  relationship::{am_following, is_own_profile},
  view::{
    CommitControl, DEFAULT_AVATAR, DEFAULT_COVER, FeedQuery, FeedSelector, FollowControl,
    ProfileView, Screen, member_since,
  },
};

pub struct ProfileScreen {
  identity: Arc<IdentityCache>,
  profile: Arc<ProfileFetcher>,
  coordinator: MutationCoordinator,
  feed: RwLock<FeedSelector>,
  edits: Mutex<EditBuffer>,
}
impl ProfileScreen {
  /// The identity cache is shared process-wide; the profile cache belongs to
  /// this screen.
  #[must_use]
  pub fn new(
    backend: Arc<dyn Backend>,
    identity: Arc<IdentityCache>,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    let profile = Arc::new(ProfileFetcher::new(backend.clone()));
    let coordinator =
      MutationCoordinator::new(backend, identity.clone(), profile.clone(), notifier);
    Self {
      identity,
      profile,
      coordinator,
      feed: RwLock::new(FeedSelector::default()),
      edits: Mutex::new(EditBuffer::default()),
    }
  }

  /// The handle last opened. Read from the profile cache, which re-keys
  /// atomically, so it always names the profile being loaded or shown.
  pub async fn route(&self) -> Option<Handle> {
    self.profile.handle().await
  }

  /// Navigates to `handle`: drops staged edits and loads the profile. Until it
  /// settles the screen renders as loading, never as the previous profile.
  ///
  /// Returns `None` if another navigation superseded this one.
  pub async fn open(&self, handle: Handle) -> Option<ProfileState> {
    event!(Level::INFO, "Opening @{handle}.");
    self.edits.lock().await.clear();
    self.profile.fetch(handle).await
  }

  /// Reloads the current profile.
  pub async fn refresh(&self) -> Option<ProfileState> {
    self.profile.refetch().await
  }

  pub async fn select_feed(&self, feed: FeedSelector) {
    *self.feed.write().await = feed;
  }

  /// Stages a picked image. Only possible on one's own loaded profile; empty
  /// files are dropped and the slot keeps its value.
  ///
  /// Returns whether the slot changed.
  pub async fn stage(&self, slot: MediaSlot, bytes: &[u8]) -> bool {
    if !self.viewing_own_profile().await {
      event!(Level::DEBUG, "Not the viewer's profile, ignoring {slot:?} image.");
      return false;
    }
    match self.edits.lock().await.stage(slot, bytes) {
      Ok(()) => true,
      Err(e) => {
        event!(Level::DEBUG, "Ignoring picked {slot:?} image: {e}");
        false
      }
    }
  }

  pub async fn stage_cover(&self, bytes: &[u8]) -> bool {
    self.stage(MediaSlot::Cover, bytes).await
  }

  pub async fn stage_avatar(&self, bytes: &[u8]) -> bool {
    self.stage(MediaSlot::Avatar, bytes).await
  }

  pub async fn clear_edits(&self) {
    self.edits.lock().await.clear();
  }

  pub async fn has_pending_edits(&self) -> bool {
    self.edits.lock().await.has_pending_edits()
  }

  pub async fn toggle_follow(&self) -> MutationOutcome {
    let Some(record) = self.loaded().await else {
      return MutationOutcome::Rejected(Precondition::NotLoaded);
    };
    self.coordinator.toggle_follow(&record.id).await
  }

  pub async fn commit_edits(&self) -> MutationOutcome {
    self.coordinator.commit_profile_update(&self.edits).await
  }

  pub async fn render(&self) -> Screen {
    let Some(handle) = self.route().await else {
      return Screen::Loading;
    };
    let record = match self.profile.state_for(&handle).await {
      ProfileState::Pending => return Screen::Loading,
      ProfileState::NotFound => return Screen::NotFound,
      ProfileState::Failed(failure) => return Screen::Failed(failure),
      ProfileState::Ready(record) => record,
    };

    let identity = self.identity.record().await;
    let viewer = identity.as_deref();
    let own = is_own_profile(viewer, Some(&record));

    let follow = (viewer.is_some() && !own).then(|| {
      if self.coordinator.is_toggling_follow() {
        FollowControl::Busy
      } else if am_following(viewer, Some(&record)) {
        FollowControl::Unfollow
      } else {
        FollowControl::Follow
      }
    });
    let feed = *self.feed.read().await;

    let edits = self.edits.lock().await;
    let staged = |slot| if own { edits.get(slot) } else { None };
    let cover_src = image_source(staged(MediaSlot::Cover), record.cover(), DEFAULT_COVER);
    let avatar_src = image_source(staged(MediaSlot::Avatar), record.avatar(), DEFAULT_AVATAR);
    let commit = (own && edits.has_pending_edits()).then(|| {
      if self.coordinator.is_updating_profile() {
        CommitControl::Updating
      } else {
        CommitControl::Update
      }
    });
    drop(edits);

    Screen::Loaded(Box::new(ProfileView {
      cover_src,
      avatar_src,
      link: Some(record.link.clone()).filter(|link| !link.is_empty()),
      member_since: member_since(record.created_at),
      following_count: record.following.len(),
      followers_count: record.followers.len(),
      can_edit: own,
      follow,
      commit,
      feed,
      profile: record,
    }))
  }

  /// What the feed listing under the header should show.
  pub async fn feed_query(&self) -> Option<FeedQuery> {
    let handle = self.route().await?;
    let profile_id = self.loaded().await.map(|record| record.id.clone());
    Some(FeedQuery {
      feed: *self.feed.read().await,
      handle,
      profile_id,
    })
  }

  async fn loaded(&self) -> Option<Arc<ProfileRecord>> {
    let handle = self.route().await?;
    match self.profile.state_for(&handle).await {
      ProfileState::Ready(record) => Some(record),
      _ => None,
    }
  }

  async fn viewing_own_profile(&self) -> bool {
    let identity = self.identity.record().await;
    let record = self.loaded().await;
    is_own_profile(identity.as_deref(), record.as_deref())
  }
}

fn image_source(staged: Option<&StagedImage>, stored: Option<&str>, fallback: &str) -> String {
  staged
    .map(StagedImage::as_data_url)
    .or(stored)
    .unwrap_or(fallback)
    .to_owned()
}

//! In-memory stand-in for the server, for driving the profile screen in tests.
//!
//! Follows the server's rules for follows and media uploads, records every call
//! and can hold individual requests until the test releases them.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;
use types::{
  UserId,
  entities::{
    profile_update::ProfileUpdate,
    user::{IdentityRecord, ProfileRecord},
  },
};

use crate::{Backend, Error, get_identity, get_profile, toggle_follow, update_profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Identity,
  Profile(String),
  ToggleFollow(String),
  UpdateProfile(ProfileUpdate),
}

/// A request kind that can be held back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gate {
  Identity,
  Profile(String),
  ToggleFollow,
  UpdateProfile,
}

#[derive(Debug, Default)]
struct State {
  users: HashMap<UserId, ProfileRecord>,
  signed_in: Option<UserId>,
  calls: Vec<Call>,
  failing_profiles: HashSet<String>,
  identity_failure: bool,
  follow_failure: Option<String>,
  update_failure: Option<String>,
  uploads: u32,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
  state: Mutex<State>,
  gates: Mutex<HashMap<Gate, Arc<Notify>>>,
}
impl FakeBackend {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a bare user record, created on 2024-07-02.
  #[must_use]
  pub fn user(id: &str, handle: &str) -> ProfileRecord {
    ProfileRecord {
      id: id.into(),
      full_name: handle.to_uppercase(),
      username: handle.into(),
      bio: String::new(),
      link: String::new(),
      created_at: Utc
        .with_ymd_and_hms(2024, 7, 2, 10, 0, 0)
        .single()
        .unwrap_or_default(),
      cover_image: None,
      profile_image: None,
      followers: HashSet::new(),
      following: HashSet::new(),
    }
  }

  #[must_use]
  pub fn with_user(self, record: ProfileRecord) -> Self {
    self.lock().users.insert(record.id.clone(), record);
    self
  }

  #[must_use]
  pub fn signed_in_as(self, id: &str) -> Self {
    self.lock().signed_in = Some(id.into());
    self
  }

  pub fn sign_out(&self) {
    self.lock().signed_in = None;
  }

  pub fn fail_identity(&self) {
    self.lock().identity_failure = true;
  }

  pub fn fail_profile(&self, handle: &str) {
    self.lock().failing_profiles.insert(handle.to_owned());
  }

  pub fn fail_follow(&self, message: &str) {
    self.lock().follow_failure = Some(message.to_owned());
  }

  pub fn fail_update(&self, message: &str) {
    self.lock().update_failure = Some(message.to_owned());
  }

  /// Holds the next request of that kind until the returned handle is notified.
  pub fn hold(&self, gate: Gate) -> Arc<Notify> {
    let notify = Arc::new(Notify::new());
    self
      .gates
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(gate, notify.clone());
    notify
  }

  #[must_use]
  pub fn calls(&self) -> Vec<Call> {
    self.lock().calls.clone()
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  async fn enter(&self, call: Call, gate: Gate) {
    self.lock().calls.push(call);
    let held = self
      .gates
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&gate);
    if let Some(notify) = held {
      notify.notified().await;
    }
  }
}

fn identity_of(record: &ProfileRecord) -> IdentityRecord {
  IdentityRecord {
    id: record.id.clone(),
    username: record.username.clone(),
    full_name: record.full_name.clone(),
    profile_image: record.profile_image.clone(),
    followers: record.followers.clone(),
    following: record.following.clone(),
  }
}

fn rejected<E>(status: u16, message: &str) -> Error<E> {
  Error::Rejected {
    status,
    message: message.to_owned(),
  }
}

#[async_trait]
impl Backend for FakeBackend {
  async fn get_profile(&self, handle: &str) -> Result<ProfileRecord, Error<get_profile::Error>> {
    self
      .enter(Call::Profile(handle.to_owned()), Gate::Profile(handle.to_owned()))
      .await;

    let state = self.lock();
    if state.failing_profiles.contains(handle) {
      return Err(rejected(500, "Internal Server Error"));
    }
    state
      .users
      .values()
      .find(|u| &*u.username == handle)
      .cloned()
      .ok_or(Error::Other(get_profile::Error::NotFound))
  }

  async fn get_identity(&self) -> Result<IdentityRecord, Error<get_identity::Error>> {
    self.enter(Call::Identity, Gate::Identity).await;

    let state = self.lock();
    if state.identity_failure {
      return Err(rejected(500, "Internal Server Error"));
    }
    state
      .signed_in
      .as_ref()
      .and_then(|id| state.users.get(id))
      .map(identity_of)
      .ok_or(Error::Other(get_identity::Error::Unauthenticated))
  }

  async fn toggle_follow(&self, target_id: &str) -> Result<(), Error<toggle_follow::Error>> {
    self
      .enter(Call::ToggleFollow(target_id.to_owned()), Gate::ToggleFollow)
      .await;

    let mut state = self.lock();
    if let Some(message) = &state.follow_failure {
      return Err(rejected(500, message));
    }
    let Some(me) = state.signed_in.clone() else {
      return Err(rejected(401, "Unauthorized: No Token Provided"));
    };
    if &*me == target_id {
      return Err(rejected(400, "You can't follow/unfollow yourself"));
    }
    let Some(target) = state.users.get_mut(target_id) else {
      return Err(rejected(400, "User not found"));
    };

    let now_following = !target.followers.remove(&me);
    if now_following {
      target.followers.insert(me.clone());
    }
    let target: UserId = target_id.into();
    if let Some(viewer) = state.users.get_mut(&me) {
      if now_following {
        viewer.following.insert(target);
      } else {
        viewer.following.remove(&target);
      }
    }
    Ok(())
  }

  async fn update_profile(
    &self,
    update: &ProfileUpdate,
  ) -> Result<(), Error<update_profile::Error>> {
    self
      .enter(Call::UpdateProfile(update.clone()), Gate::UpdateProfile)
      .await;

    let mut state = self.lock();
    if let Some(message) = &state.update_failure {
      return Err(rejected(500, message));
    }
    let Some(me) = state.signed_in.clone() else {
      return Err(rejected(401, "Unauthorized: No Token Provided"));
    };

    state.uploads += 1;
    let upload = state.uploads;
    let Some(viewer) = state.users.get_mut(&me) else {
      return Err(rejected(404, "User not found"));
    };
    if update.cover_image.is_some() {
      viewer.cover_image = Some(format!("https://cdn.example/cover-{upload}.png"));
    }
    if update.profile_image.is_some() {
      viewer.profile_image = Some(format!("https://cdn.example/avatar-{upload}.png"));
    }
    Ok(())
  }
}

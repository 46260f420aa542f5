//! The two writes of the profile screen.
//!
//! Each kind of write has at most one request in flight; a second attempt while
//! busy sends nothing. On success the identity and profile caches are
//! invalidated and reloaded before the busy flag drops, so the next click always
//! acts on fresh data. Cached records are never patched by hand.

mod commit_profile;
mod toggle_follow;

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use api::Backend;
use repositories::{identity::IdentityCache, profile::ProfileFetcher};
use thiserror::Error as ThisError;

use crate::notify::Notifier;

pub static PROFILE_UPDATED: &str = "Profile updated successfully";

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MutationFailure(pub String);

/// Why a mutation was refused before any request went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
  NotSignedIn,
  NotLoaded,
  OwnProfile,
  NothingStaged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
  Succeeded,
  Failed(MutationFailure),
  /// The same mutation is already in flight.
  Busy,
  Rejected(Precondition),
}

pub struct MutationCoordinator {
  backend: Arc<dyn Backend>,
  identity: Arc<IdentityCache>,
  profile: Arc<ProfileFetcher>,
  notifier: Arc<dyn Notifier>,
  toggling_follow: AtomicBool,
  updating_profile: AtomicBool,
}
impl MutationCoordinator {
  #[must_use]
  pub fn new(
    backend: Arc<dyn Backend>,
    identity: Arc<IdentityCache>,
    profile: Arc<ProfileFetcher>,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      backend,
      identity,
      profile,
      notifier,
      toggling_follow: AtomicBool::new(false),
      updating_profile: AtomicBool::new(false),
    }
  }

  #[must_use]
  pub fn is_toggling_follow(&self) -> bool {
    self.toggling_follow.load(Ordering::Acquire)
  }

  #[must_use]
  pub fn is_updating_profile(&self) -> bool {
    self.updating_profile.load(Ordering::Acquire)
  }

  async fn invalidate_all(&self) {
    tokio::join!(self.identity.invalidate(), self.profile.refetch());
  }
}

/// Holds a busy flag for as long as it lives.
struct BusyGuard<'a>(&'a AtomicBool);
impl<'a> BusyGuard<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| Self(flag))
  }
}
impl Drop for BusyGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

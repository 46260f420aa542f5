//! Handle-keyed cache of the viewed profile.
//!
//! A single slot holds the state of one handle. Every fetch re-keys the slot and
//! takes a fresh generation; a response is stored only if its generation is still
//! the slot's, so a late answer for a previous handle (or an older fetch of the
//! same handle) is dropped instead of racing the current one.

use std::sync::Arc;

use api::{Backend, get_profile};
use tokio::sync::RwLock;
use tracing::{Level, event};
use types::{Handle, entities::user::ProfileRecord};

use crate::FetchFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
  Pending,
  /// The server has no such user. Terminal, not an error.
  NotFound,
  Failed(FetchFailure),
  Ready(Arc<ProfileRecord>),
}

#[derive(Debug)]
struct Slot {
  handle: Option<Handle>,
  generation: u64,
  state: ProfileState,
}

pub struct ProfileFetcher {
  backend: Arc<dyn Backend>,
  slot: RwLock<Slot>,
}
impl ProfileFetcher {
  #[must_use]
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self {
      backend,
      slot: RwLock::new(Slot {
        handle: None,
        generation: 0,
        state: ProfileState::Pending,
      }),
    }
  }

  /// Re-keys the slot to `handle` and loads it.
  ///
  /// Returns `None` when a newer fetch took the slot before this one settled.
  pub async fn fetch(&self, handle: Handle) -> Option<ProfileState> {
    let generation = {
      let mut slot = self.slot.write().await;
      slot.handle = Some(handle.clone());
      Self::restart(&mut slot)
    };
    self.load(handle, generation).await
  }

  /// Loads the current handle again. `None` if no handle was ever fetched or
  /// the reload was superseded.
  pub async fn refetch(&self) -> Option<ProfileState> {
    let (handle, generation) = {
      let mut slot = self.slot.write().await;
      let handle = slot.handle.clone()?;
      (handle, Self::restart(&mut slot))
    };
    self.load(handle, generation).await
  }

  /// State as seen by a view of `handle`. Another handle's data is never
  /// returned: a slot keyed differently reads as pending.
  pub async fn state_for(&self, handle: &str) -> ProfileState {
    let slot = self.slot.read().await;
    match &slot.handle {
      Some(current) if &**current == handle => slot.state.clone(),
      _ => ProfileState::Pending,
    }
  }

  pub async fn handle(&self) -> Option<Handle> {
    self.slot.read().await.handle.clone()
  }

  fn restart(slot: &mut Slot) -> u64 {
    slot.generation += 1;
    slot.state = ProfileState::Pending;
    slot.generation
  }

  async fn load(&self, handle: Handle, generation: u64) -> Option<ProfileState> {
    event!(Level::DEBUG, "Fetching profile of @{handle} (#{generation}).");
    let state = match self.backend.get_profile(&handle).await {
      Ok(record) => ProfileState::Ready(Arc::new(record)),
      Err(api::Error::Other(get_profile::Error::NotFound)) => {
        event!(Level::INFO, "@{handle} does not exist.");
        ProfileState::NotFound
      }
      Err(e) => {
        event!(Level::WARN, "Failed to fetch profile of @{handle}: {e}");
        ProfileState::Failed(FetchFailure(e.to_string()))
      }
    };

    let mut slot = self.slot.write().await;
    if slot.generation != generation {
      event!(
        Level::DEBUG,
        "Discarding profile of @{handle} (#{generation}), superseded by #{}.",
        slot.generation
      );
      return None;
    }
    slot.state = state.clone();
    Some(state)
  }
}

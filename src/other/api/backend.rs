use async_trait::async_trait;
use types::entities::{
  profile_update::ProfileUpdate,
  user::{IdentityRecord, ProfileRecord},
};

use crate::{Error, Session, get_identity, get_profile, toggle_follow, update_profile};

/// The server endpoints the profile screen relies on.
#[async_trait]
pub trait Backend: Send + Sync {
  async fn get_profile(&self, handle: &str) -> Result<ProfileRecord, Error<get_profile::Error>>;
  async fn get_identity(&self) -> Result<IdentityRecord, Error<get_identity::Error>>;
  async fn toggle_follow(&self, target_id: &str) -> Result<(), Error<toggle_follow::Error>>;
  async fn update_profile(
    &self,
    update: &ProfileUpdate,
  ) -> Result<(), Error<update_profile::Error>>;
}

#[async_trait]
impl Backend for Session {
  async fn get_profile(&self, handle: &str) -> Result<ProfileRecord, Error<get_profile::Error>> {
    get_profile::act(self, handle).await
  }

  async fn get_identity(&self) -> Result<IdentityRecord, Error<get_identity::Error>> {
    get_identity::act(self).await
  }

  async fn toggle_follow(&self, target_id: &str) -> Result<(), Error<toggle_follow::Error>> {
    toggle_follow::act(self, target_id).await
  }

  async fn update_profile(
    &self,
    update: &ProfileUpdate,
  ) -> Result<(), Error<update_profile::Error>> {
    update_profile::act(self, update).await
  }
}

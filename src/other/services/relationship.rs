//! Follow and ownership, derived on every render from the two source records.
//! Neither side being loaded yields `false`: no unfollow state and no edit
//! controls for a viewer that is unknown or still resolving.

use types::entities::user::{IdentityRecord, ProfileRecord};

#[must_use]
pub fn am_following(identity: Option<&IdentityRecord>, profile: Option<&ProfileRecord>) -> bool {
  match (identity, profile) {
    (Some(identity), Some(profile)) => identity.following.contains(&profile.id),
    _ => false,
  }
}

#[must_use]
pub fn is_own_profile(identity: Option<&IdentityRecord>, profile: Option<&ProfileRecord>) -> bool {
  match (identity, profile) {
    (Some(identity), Some(profile)) => identity.id == profile.id,
    _ => false,
  }
}

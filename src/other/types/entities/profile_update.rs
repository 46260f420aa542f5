use serde::{Deserialize, Serialize};

/// Body of a profile update. Each image is a self-contained data URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cover_image: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile_image: Option<String>,
}
impl ProfileUpdate {
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.cover_image.is_none() && self.profile_image.is_none()
  }
}

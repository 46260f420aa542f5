use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Handle, UserId};

/// A user as shown on their profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
  #[serde(rename = "_id")]
  pub id: UserId,
  pub full_name: String,
  pub username: Handle,
  #[serde(default)]
  pub bio: String,
  #[serde(default)]
  pub link: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub cover_image: Option<String>,
  #[serde(default)]
  pub profile_image: Option<String>,
  #[serde(default)]
  pub followers: HashSet<UserId>,
  #[serde(default)]
  pub following: HashSet<UserId>,
}
impl ProfileRecord {
  /// Server-side cover image, if any. Empty references count as missing.
  #[must_use]
  pub fn cover(&self) -> Option<&str> {
    non_empty(self.cover_image.as_deref())
  }

  /// Server-side avatar image, if any. Empty references count as missing.
  #[must_use]
  pub fn avatar(&self) -> Option<&str> {
    non_empty(self.profile_image.as_deref())
  }
}

/// The authenticated viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
  #[serde(rename = "_id")]
  pub id: UserId,
  pub username: Handle,
  #[serde(default)]
  pub full_name: String,
  #[serde(default)]
  pub profile_image: Option<String>,
  #[serde(default)]
  pub followers: HashSet<UserId>,
  #[serde(default)]
  pub following: HashSet<UserId>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
  s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_server_user_document() {
    let json = r#"{
      "_id": "u1",
      "fullName": "Alice Liddell",
      "username": "alice",
      "email": "alice@example.com",
      "bio": "down the rabbit hole",
      "link": "",
      "createdAt": "2024-07-02T10:00:00.000Z",
      "coverImage": "",
      "profileImage": "https://cdn.example/a.png",
      "followers": ["u2", "u3"],
      "following": ["u2"]
    }"#;

    let record: ProfileRecord = serde_json::from_str(json).unwrap();
    assert_eq!(&*record.id, "u1");
    assert_eq!(&*record.username, "alice");
    assert_eq!(record.cover(), None);
    assert_eq!(record.avatar(), Some("https://cdn.example/a.png"));
    assert_eq!(record.followers.len(), 2);
    assert!(record.following.contains("u2"));
  }

  #[test]
  fn identity_tolerates_missing_optional_fields() {
    let json = r#"{ "_id": "u9", "username": "zed" }"#;

    let identity: IdentityRecord = serde_json::from_str(json).unwrap();
    assert!(identity.following.is_empty());
    assert_eq!(identity.profile_image, None);
  }
}

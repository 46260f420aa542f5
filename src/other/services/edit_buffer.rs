//! Locally picked cover and avatar images waiting for a commit.
//!
//! Staged images are only previews: the profile record is never patched with
//! them, since the stored media reference is only known once the server answers.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error as ThisError;
use tracing::{Level, event};
use types::entities::profile_update::ProfileUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
  Cover,
  Avatar,
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
  #[error("The file is empty")]
  Empty,
}

static SVG_MIME: &str = "image/svg+xml";
static FALLBACK_MIME: &str = "application/octet-stream";

/// An image as a `data:` URL, good both for previewing and for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage(String);
impl StagedImage {
  /// Any picked file is accepted; the picker filters by type. The MIME type is
  /// sniffed from the content, falling back to `application/octet-stream`.
  ///
  /// # Errors
  ///
  /// When the bytes are empty.
  pub fn encode(bytes: &[u8]) -> Result<Self, DecodeFailure> {
    if bytes.is_empty() {
      return Err(DecodeFailure::Empty);
    }
    Ok(Self(format!(
      "data:{};base64,{}",
      sniff_mime(bytes),
      STANDARD.encode(bytes)
    )))
  }

  #[must_use]
  pub fn as_data_url(&self) -> &str {
    &self.0
  }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
  if let Ok(format) = image::guess_format(bytes) {
    return format.to_mime_type();
  }
  let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
  let head = head.trim_start_matches('\u{feff}').trim_start();
  if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
    SVG_MIME
  } else {
    event!(Level::DEBUG, "Unrecognised image content, staging as {FALLBACK_MIME}.");
    FALLBACK_MIME
  }
}

#[derive(Debug, Default)]
pub struct EditBuffer {
  cover: Option<StagedImage>,
  avatar: Option<StagedImage>,
}
impl EditBuffer {
  /// Replaces whatever `slot` held. On failure the slot keeps its previous value.
  ///
  /// # Errors
  ///
  /// See [`StagedImage::encode`].
  pub fn stage(&mut self, slot: MediaSlot, bytes: &[u8]) -> Result<(), DecodeFailure> {
    let image = StagedImage::encode(bytes)?;
    event!(Level::DEBUG, "Staged a new {slot:?} image ({} bytes).", bytes.len());
    *self.slot_mut(slot) = Some(image);
    Ok(())
  }

  #[must_use]
  pub const fn get(&self, slot: MediaSlot) -> Option<&StagedImage> {
    match slot {
      MediaSlot::Cover => self.cover.as_ref(),
      MediaSlot::Avatar => self.avatar.as_ref(),
    }
  }

  pub fn clear(&mut self) {
    self.cover = None;
    self.avatar = None;
  }

  #[must_use]
  pub const fn has_pending_edits(&self) -> bool {
    self.cover.is_some() || self.avatar.is_some()
  }

  #[must_use]
  pub fn to_update(&self) -> ProfileUpdate {
    let data_url = |image: &StagedImage| image.0.clone();
    ProfileUpdate {
      cover_image: self.cover.as_ref().map(data_url),
      profile_image: self.avatar.as_ref().map(data_url),
    }
  }

  const fn slot_mut(&mut self, slot: MediaSlot) -> &mut Option<StagedImage> {
    match slot {
      MediaSlot::Cover => &mut self.cover,
      MediaSlot::Avatar => &mut self.avatar,
    }
  }
}

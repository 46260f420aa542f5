use std::sync::{Arc, Mutex, PoisonError};

use api::testing::{Call, FakeBackend};
use repositories::identity::IdentityCache;
use services::{
  notify::{Notice, Notifier},
  screen::ProfileScreen,
  view::{ProfileView, Screen},
};
use tokio::task::yield_now;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<Notice>>);
impl RecordingNotifier {
  pub fn notices(&self) -> Vec<Notice> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}
impl Notifier for RecordingNotifier {
  fn notify(&self, notice: Notice) {
    self
      .0
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(notice);
  }
}

pub struct Harness {
  pub fake: Arc<FakeBackend>,
  pub notices: Arc<RecordingNotifier>,
  pub screen: Arc<ProfileScreen>,
}

/// `u1`/alice and `u2`/bob exist; `viewer` is signed in, if any. Identity is
/// resolved, nothing is opened yet.
pub async fn harness(viewer: Option<&str>) -> Harness {
  let mut fake = FakeBackend::new()
    .with_user(FakeBackend::user("u1", "alice"))
    .with_user(FakeBackend::user("u2", "bob"));
  if let Some(id) = viewer {
    fake = fake.signed_in_as(id);
  }
  let fake = Arc::new(fake);

  let identity = Arc::new(IdentityCache::new(fake.clone()));
  identity.refresh().await;
  let notices = Arc::new(RecordingNotifier::default());
  let screen = Arc::new(ProfileScreen::new(
    fake.clone(),
    identity,
    notices.clone(),
  ));
  Harness {
    fake,
    notices,
    screen,
  }
}

pub async fn until_called(fake: &FakeBackend, call: &Call) {
  while !fake.calls().contains(call) {
    yield_now().await;
  }
}

pub fn count(fake: &FakeBackend, call: &Call) -> usize {
  fake.calls().iter().filter(|c| *c == call).count()
}

pub async fn loaded(screen: &ProfileScreen) -> ProfileView {
  match screen.render().await {
    Screen::Loaded(view) => *view,
    other => panic!("expected a loaded profile, got {other:?}"),
  }
}

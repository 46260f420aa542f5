use tracing::{Level, event};

use super::{BusyGuard, MutationCoordinator, MutationFailure, MutationOutcome, Precondition};
use crate::notify::Notice;

impl MutationCoordinator {
  /// Follows `target_id`, or unfollows it if already followed.
  ///
  /// While the request is in flight the follow relationship keeps deriving from
  /// the pre-toggle records; it flips once the reloaded identity lands.
  pub async fn toggle_follow(&self, target_id: &str) -> MutationOutcome {
    let Some(viewer) = self.identity.record().await else {
      return MutationOutcome::Rejected(Precondition::NotSignedIn);
    };
    if &*viewer.id == target_id {
      return MutationOutcome::Rejected(Precondition::OwnProfile);
    }
    let Some(_busy) = BusyGuard::acquire(&self.toggling_follow) else {
      event!(Level::DEBUG, "Follow toggle already in flight, ignoring.");
      return MutationOutcome::Busy;
    };

    match self.backend.toggle_follow(target_id).await {
      Ok(()) => {
        event!(Level::INFO, "@{} toggled follow of {target_id}.", viewer.username);
        self.invalidate_all().await;
        MutationOutcome::Succeeded
      }
      Err(e) => {
        event!(Level::WARN, "Failed to toggle follow of {target_id}: {e}");
        self.notifier.notify(Notice::error(e.to_string()));
        MutationOutcome::Failed(MutationFailure(e.to_string()))
      }
    }
  }
}

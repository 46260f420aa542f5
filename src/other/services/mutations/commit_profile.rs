use tokio::sync::Mutex;
use tracing::{Level, event};

use super::{
  BusyGuard, MutationCoordinator, MutationFailure, MutationOutcome, PROFILE_UPDATED, Precondition,
};
use crate::{edit_buffer::EditBuffer, notify::Notice};

impl MutationCoordinator {
  /// Uploads the staged media. The buffer is emptied once the upload settles,
  /// whether it succeeded or not, so an attempted edit never stays staged.
  pub async fn commit_profile_update(&self, edits: &Mutex<EditBuffer>) -> MutationOutcome {
    let update = {
      let edits = edits.lock().await;
      if !edits.has_pending_edits() {
        return MutationOutcome::Rejected(Precondition::NothingStaged);
      }
      edits.to_update()
    };
    let Some(_busy) = BusyGuard::acquire(&self.updating_profile) else {
      event!(Level::DEBUG, "Profile update already in flight, ignoring.");
      return MutationOutcome::Busy;
    };

    let outcome = match self.backend.update_profile(&update).await {
      Ok(()) => {
        event!(Level::INFO, "Profile media uploaded.");
        self.notifier.notify(Notice::success(PROFILE_UPDATED));
        self.invalidate_all().await;
        MutationOutcome::Succeeded
      }
      Err(e) => {
        event!(Level::WARN, "Failed to update profile: {e}");
        self.notifier.notify(Notice::error(e.to_string()));
        MutationOutcome::Failed(MutationFailure(e.to_string()))
      }
    };

    edits.lock().await.clear();
    outcome
  }
}

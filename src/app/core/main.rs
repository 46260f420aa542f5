mod commands;
mod console;
mod on_shutdown;

use std::sync::Arc;

use anyhow::Context;
use api::{Backend, Session};
use environment::WORKSPACE_DIR;
use repositories::identity::{Identity, IdentityCache};
use services::screen::ProfileScreen;
use tracing::{Level, event};

use console::ConsoleNotifier;
use on_shutdown::{before_shutdown, shutdown_signal};

#[cfg(unix)]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv::from_filename(WORKSPACE_DIR.join(".env")).ok();
  // Logging - The variables are needed for the lifetime of the program
  let _log_guards = utils::init_logging().await;

  event!(Level::INFO, "Application starting!");

  let session = Session::from_env().context("Failed to set up the API session")?;
  if !session.has_token() {
    event!(Level::WARN, "No SESSION_TOKEN set, browsing anonymously.");
  }
  let backend: Arc<dyn Backend> = Arc::new(session);
  let identity = Arc::new(IdentityCache::new(backend.clone()));
  let screen = ProfileScreen::new(backend, identity.clone(), Arc::new(ConsoleNotifier));

  match identity.refresh().await {
    Identity::Known(viewer) => event!(Level::INFO, "Signed in as @{}.", viewer.username),
    Identity::Unavailable(e) => event!(Level::WARN, "Could not resolve the viewer: {e}"),
    Identity::Anonymous | Identity::Unresolved => event!(Level::INFO, "Not signed in."),
  }

  #[allow(clippy::redundant_pub_crate)] // Select macro propagates this
  let interactive = async {
    tokio::select! {
      () = commands::listen(&screen) => {},
      () = shutdown_signal() => {},
    }
  };
  interactive.await;

  before_shutdown(&screen).await;
  Ok(())
}

//! Process-wide cell holding the signed-in viewer.
//!
//! The cell is versioned: a refresh only lands if no other write happened since
//! it started. Anyone may ask for an invalidation, only the cache writes.

use std::sync::Arc;

use api::{Backend, get_identity};
use tokio::sync::RwLock;
use tracing::{Level, event};
use types::entities::user::IdentityRecord;

use crate::FetchFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
  /// Never loaded, or invalidated and loading again.
  Unresolved,
  Anonymous,
  Unavailable(FetchFailure),
  Known(Arc<IdentityRecord>),
}
impl Identity {
  #[must_use]
  pub const fn record(&self) -> Option<&Arc<IdentityRecord>> {
    match self {
      Self::Known(record) => Some(record),
      _ => None,
    }
  }
}

#[derive(Debug)]
struct Cell {
  version: u64,
  identity: Identity,
}

pub struct IdentityCache {
  backend: Arc<dyn Backend>,
  cell: RwLock<Cell>,
}
impl IdentityCache {
  #[must_use]
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self {
      backend,
      cell: RwLock::new(Cell {
        version: 0,
        identity: Identity::Unresolved,
      }),
    }
  }

  pub async fn current(&self) -> Identity {
    self.cell.read().await.identity.clone()
  }

  /// The known viewer, if any. Pending, anonymous and failed states all read as
  /// no viewer.
  pub async fn record(&self) -> Option<Arc<IdentityRecord>> {
    self.cell.read().await.identity.record().cloned()
  }

  pub async fn version(&self) -> u64 {
    self.cell.read().await.version
  }

  /// Loads the viewer and replaces the cell, unless it was written meanwhile.
  pub async fn refresh(&self) -> Identity {
    let version = self.version().await;
    self.load(version).await
  }

  /// Marks the cell stale and reloads it. Returns once the reload settled.
  pub async fn invalidate(&self) -> Identity {
    let version = {
      let mut cell = self.cell.write().await;
      cell.version += 1;
      cell.identity = Identity::Unresolved;
      cell.version
    };
    event!(Level::DEBUG, "Identity invalidated (v{version}).");
    self.load(version).await
  }

  async fn load(&self, version: u64) -> Identity {
    let identity = match self.backend.get_identity().await {
      Ok(record) => Identity::Known(Arc::new(record)),
      Err(api::Error::Other(get_identity::Error::Unauthenticated)) => Identity::Anonymous,
      Err(e) => {
        event!(Level::WARN, "Failed to load the signed-in user: {e}");
        Identity::Unavailable(FetchFailure(e.to_string()))
      }
    };

    let mut cell = self.cell.write().await;
    if cell.version != version {
      event!(
        Level::DEBUG,
        "Dropping identity loaded at v{version}, cell is at v{}.",
        cell.version
      );
      return cell.identity.clone();
    }
    cell.version += 1;
    cell.identity = identity.clone();
    identity
  }
}

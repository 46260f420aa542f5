pub mod entities;

use std::sync::Arc;

/// Internal, server-assigned user id.
pub type UserId = Arc<str>;
/// Human-readable profile key used for navigation and fetching.
pub type Handle = Arc<str>;

use reqwest::{Method, StatusCode};
use serde::de::IgnoredAny;
use thiserror::Error as ThisError;

use crate::{ApiReq, Session};

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {}

/// Follow the target if not followed yet, unfollow otherwise.
///
/// # Errors
///
/// Will return any unhandled request errors.
pub async fn act(session: &Session, target_id: &str) -> Result<(), super::Error<Error>> {
  Request { target_id }.act(session).await?;
  Ok(())
}

struct Request<'a> {
  target_id: &'a str,
}
impl ApiReq for Request<'_> {
  // Only the status matters, the body is a confirmation message.
  type Output = IgnoredAny;
  type HandledError = Error;
  const RETRYABLE: bool = false;

  fn method() -> Method {
    Method::POST
  }

  fn path(&self) -> Vec<&str> {
    vec!["api", "users", "follow", self.target_id]
  }

  fn handle_error_status(_: StatusCode) -> Option<super::Error<Error>> {
    None // This request has no custom errors
  }
}

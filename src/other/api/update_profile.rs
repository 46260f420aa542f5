use reqwest::{Method, StatusCode};
use serde::de::IgnoredAny;
use thiserror::Error as ThisError;
use types::entities::profile_update::ProfileUpdate;

use crate::{ApiReq, Session};

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {}

/// Upload new profile media. The server answers with the stored user, which is
/// not trusted here: callers re-fetch instead.
///
/// # Errors
///
/// Will return any unhandled request errors.
pub async fn act(session: &Session, update: &ProfileUpdate) -> Result<(), super::Error<Error>> {
  Request { update }.act(session).await?;
  Ok(())
}

struct Request<'a> {
  update: &'a ProfileUpdate,
}
impl ApiReq for Request<'_> {
  type Output = IgnoredAny;
  type HandledError = Error;
  const RETRYABLE: bool = false;

  fn method() -> Method {
    Method::POST
  }

  fn path(&self) -> Vec<&str> {
    vec!["api", "users", "update"]
  }

  fn body(&self) -> serde_json::Result<Option<serde_json::Value>> {
    serde_json::to_value(self.update).map(Some)
  }

  fn handle_error_status(_: StatusCode) -> Option<super::Error<Error>> {
    None // This request has no custom errors
  }
}

use reqwest::{Method, StatusCode};
use thiserror::Error as ThisError;
use types::entities::user::ProfileRecord;

use crate::{ApiReq, Session};

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("User not found")]
  NotFound,
}

/// Get the profile of a user by handle.
///
/// # Errors
///
/// Will return any unhandled request errors.
pub async fn act(session: &Session, handle: &str) -> Result<ProfileRecord, super::Error<Error>> {
  Request { handle }.act(session).await
}

struct Request<'a> {
  handle: &'a str,
}
impl ApiReq for Request<'_> {
  type Output = ProfileRecord;
  type HandledError = Error;
  const RETRYABLE: bool = true;

  fn method() -> Method {
    Method::GET
  }

  fn path(&self) -> Vec<&str> {
    vec!["api", "users", "profile", self.handle]
  }

  fn handle_error_status(status: StatusCode) -> Option<super::Error<Error>> {
    (status == StatusCode::NOT_FOUND).then_some(super::Error::Other(Error::NotFound))
  }
}

use reqwest::{Method, StatusCode};
use thiserror::Error as ThisError;
use types::entities::user::IdentityRecord;

use crate::{ApiReq, Session};

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("Not signed in")]
  Unauthenticated,
}

/// Get the user the session is signed in as.
///
/// # Errors
///
/// Will return any unhandled request errors.
pub async fn act(session: &Session) -> Result<IdentityRecord, super::Error<Error>> {
  if !session.has_token() {
    return Err(super::Error::Other(Error::Unauthenticated));
  }
  Request.act(session).await
}

struct Request;
impl ApiReq for Request {
  type Output = IdentityRecord;
  type HandledError = Error;
  const RETRYABLE: bool = true;

  fn method() -> Method {
    Method::GET
  }

  fn path(&self) -> Vec<&str> {
    vec!["api", "auth", "me"]
  }

  fn handle_error_status(status: StatusCode) -> Option<super::Error<Error>> {
    match status {
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        Some(super::Error::Other(Error::Unauthenticated))
      }
      _ => None,
    }
  }
}

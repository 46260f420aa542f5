use reqwest::{Method, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error as ThisError;
use tracing::{Level, event};

mod backend;
mod session;
pub use backend::Backend;
pub use session::{Session, SessionError};

pub mod get_identity;
pub mod get_profile;
pub mod toggle_follow;
pub mod update_profile;

#[cfg(feature = "testing")]
pub mod testing;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error<Other> {
  #[error("Could not reach the server")]
  Api,
  #[error("Invalid server data")]
  BadData,
  #[error("{message}")]
  Rejected { status: u16, message: String },
  #[error(transparent)]
  Other(#[from] Other),
}

/// Shown when a rejection carries no usable error body.
pub static FALLBACK_MESSAGE: &str = "Something went wrong";

static PER_REQ_MAX_RETRIES: u8 = 3;

#[derive(Deserialize)]
struct ErrorBody {
  error: Option<String>,
}

trait ApiReq: Sized {
  type Output: DeserializeOwned;
  type HandledError: std::error::Error;
  /// Transport failures are retried only for idempotent requests.
  const RETRYABLE: bool;

  fn method() -> Method;
  fn path(&self) -> Vec<&str>;
  fn body(&self) -> serde_json::Result<Option<serde_json::Value>> {
    Ok(None)
  }
  fn handle_error_status(status: StatusCode) -> Option<Error<Self::HandledError>>;

  async fn act(self, session: &Session) -> Result<Self::Output, Error<Self::HandledError>> {
    session.minimum_delay().await;

    let mut failed_attempts = 0;
    loop {
      match self.attempt(session).await {
        Err(None) => {
          if !Self::RETRYABLE || failed_attempts >= PER_REQ_MAX_RETRIES {
            return Err(Error::Api);
          }

          failed_attempts += 1;
          event!(
            Level::DEBUG,
            "Retrying /{} ({failed_attempts}/{PER_REQ_MAX_RETRIES})",
            self.path().join("/")
          );
        }
        Ok(output) => return Ok(output),
        Err(Some(err)) => return Err(err),
      }
    }
  }

  /// `Err(None)` means the request never got an answer.
  async fn attempt(
    &self,
    session: &Session,
  ) -> Result<Self::Output, Option<Error<Self::HandledError>>> {
    let body = self.body().map_err(|e| {
      event!(Level::WARN, "Failed to encode request body: {e}");
      Some(Error::BadData)
    })?;
    let mut request = session.request(Self::method(), &self.path());
    if let Some(body) = body {
      request = request.json(&body);
    }

    let response = match request.send().await {
      Ok(response) => response,
      Err(e) => {
        event!(Level::WARN, "Failed to issue request, API Error: {e}");
        return Err(None);
      }
    };

    let status = response.status();
    if status.is_success() {
      return response.json::<Self::Output>().await.map_err(|e| {
        event!(Level::WARN, "Failed to decode response, bad data: {e}");
        Some(Error::BadData)
      });
    }

    let message = response
      .json::<ErrorBody>()
      .await
      .ok()
      .and_then(|body| body.error)
      .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());
    event!(
      Level::WARN,
      "Request rejected. Status Code: {status}. Error: {message}."
    );

    Err(Some(Self::handle_error_status(status).unwrap_or_else(
      || Error::Rejected {
        status: status.as_u16(),
        message,
      },
    )))
  }
}

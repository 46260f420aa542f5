use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, header};
use thiserror::Error as ThisError;
use tokio::{sync::Mutex, time::sleep};
use tracing::{Level, event};
use url::Url;

use environment::{API_BASE_URL, HTTP_TIMEOUT_SECS, MIN_REQUEST_DELAY_MS, SESSION_TOKEN};

#[derive(ThisError, Debug)]
pub enum SessionError {
  #[error("Invalid base URL: {0}")]
  Url(#[from] url::ParseError),
  #[error("Base URL cannot carry a path: {0}")]
  NotABase(Url),
  #[error(transparent)]
  Client(#[from] reqwest::Error),
}

/// HTTP agent of the viewer: server location, session cookie and request pacing.
#[derive(Debug)]
pub struct Session {
  client: Client,
  base_url: Url,
  token: Option<Box<str>>,
  min_delay: Duration,
  last_action: Mutex<DateTime<Utc>>,
}
impl Session {
  /// # Errors
  ///
  /// When the base URL is invalid or the HTTP client cannot be built.
  pub fn new(
    base_url: &str,
    token: Option<&str>,
    timeout: Duration,
    min_delay: Duration,
  ) -> Result<Self, SessionError> {
    let base_url = Url::parse(base_url)?;
    if base_url.cannot_be_a_base() {
      return Err(SessionError::NotABase(base_url));
    }

    let client = Client::builder().timeout(timeout).build()?;
    event!(Level::INFO, "Session created for {base_url}.");

    Ok(Self {
      client,
      base_url,
      token: token.map(Box::from),
      min_delay,
      last_action: Mutex::new(DateTime::<Utc>::default()),
    })
  }

  /// Builds a session from the environment configuration.
  ///
  /// # Errors
  ///
  /// Same as [`Session::new`].
  pub fn from_env() -> Result<Self, SessionError> {
    Self::new(
      *API_BASE_URL,
      *SESSION_TOKEN,
      Duration::from_secs(*HTTP_TIMEOUT_SECS),
      Duration::from_millis(*MIN_REQUEST_DELAY_MS),
    )
  }

  #[must_use]
  pub const fn has_token(&self) -> bool {
    self.token.is_some()
  }

  pub(crate) fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    // Checked in `new`: the base always accepts path segments.
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
    let builder = self.client.request(method, self.url(segments));
    match &self.token {
      Some(token) => builder.header(header::COOKIE, format!("jwt={token}")),
      None => builder,
    }
  }

  /// Keeps at least `min_delay` between two requests of this session.
  pub(crate) async fn minimum_delay(&self) {
    let mut last_action = self.last_action.lock().await;
    let elapsed = Utc::now()
      .signed_duration_since(*last_action)
      .to_std()
      .unwrap_or_default();
    if elapsed < self.min_delay {
      sleep(self.min_delay - elapsed).await;
    }
    *last_action = Utc::now();
  }
}

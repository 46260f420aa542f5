use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use tracing::level_filters::LevelFilter;

use crate::{owned_var_or, try_leak, var_opt, var_or, var_or_else};

lazy_static! {
  pub static ref STDOUT_LOG_SEVERITY: LevelFilter =
    owned_var_or("STDOUT_LOG_SEVERITY", LevelFilter::WARN);
  pub static ref LOG_DIRECTORY: &'static Path =
    var_or_else("LOG_DIRECTORY", || PathBuf::from("/var/log/profile_view"));
  pub static ref API_BASE_URL: &'static str =
    var_or::<String, _>("API_BASE_URL", "http://localhost:5000");
  /// Value of the `jwt` session cookie. Unauthenticated when unset.
  pub static ref SESSION_TOKEN: Option<&'static str> = var_opt::<String, _>("SESSION_TOKEN");
  pub static ref HTTP_TIMEOUT_SECS: u64 = owned_var_or("HTTP_TIMEOUT_SECS", 30);
  pub static ref MIN_REQUEST_DELAY_MS: u64 = owned_var_or("MIN_REQUEST_DELAY_MS", 10);
}

#[cfg(debug_assertions)]
lazy_static! {
  pub static ref WORKSPACE_DIR: &'static Path = {
    let output = std::process::Command::new(env!("CARGO"))
      .arg("locate-project")
      .arg("--workspace")
      .arg("--message-format=plain")
      .output()
      .unwrap_or_else(|e| panic!("Failed to locate the cargo workspace: {e}"))
      .stdout;
    let cargo_path = std::str::from_utf8(&output)
      .map(|s| Path::new(s.trim()))
      .unwrap_or_else(|e| panic!("Cargo returned a non UTF-8 path: {e}"));
    let workspace = cargo_path.parent().unwrap_or_else(|| Path::new("."));
    try_leak(workspace.to_path_buf()).unwrap_or_else(|| panic!("Failed to leak workspace path"))
  };
}

#[cfg(not(debug_assertions))]
lazy_static! {
  pub static ref WORKSPACE_DIR: &'static Path =
    try_leak(PathBuf::from(".")).unwrap_or_else(|| panic!("Failed to leak workspace path"));
}

use std::str::FromStr;

mod environment;
pub use environment::*;

/// Utility to attempt leaking a Box to your desired static reference type.
fn try_leak<ToLeak, R: ?Sized>(to_leak: ToLeak) -> Option<&'static R>
where
  Box<R>: TryFrom<ToLeak>,
{
  let leaked: &'static R = Box::<R>::try_from(to_leak).ok().map(Box::leak)?;
  Some(leaked)
}

/// Reads and parses a variable without leaking it. Empty values count as unset.
fn owned_var_opt<T: FromStr>(name: &'static str) -> Option<T> {
  std::env::var(name)
    .ok()
    .filter(|s| !s.is_empty())?
    .parse::<T>()
    .ok()
}

/// For `Copy`-like settings with a sensible default. Not worth leaking.
fn owned_var_or<T: FromStr>(name: &'static str, default: T) -> T {
  owned_var_opt(name).unwrap_or(default)
}

/// Optional setting, handled by the caller.
///
/// # Leaks
/// This method will leak the parsed value, if any.
fn var_opt<Parsed: FromStr, R: ?Sized>(name: &'static str) -> Option<&'static R>
where
  Box<R>: TryFrom<Parsed>,
{
  try_leak(owned_var_opt::<Parsed>(name)?)
}

/// Setting with a default that already lives in the binary, e.g. a string literal.
///
/// # Leaks
/// This method will leak the parsed value.
fn var_or<Parsed: FromStr, R: ?Sized>(name: &'static str, default: &'static R) -> &'static R
where
  Box<R>: TryFrom<Parsed>,
{
  var_opt::<Parsed, R>(name).unwrap_or(default)
}

/// Setting whose default has to be built first.
/// E.g.: An owned `PathBuf` -> A `&'static Path`.
///
/// # Leaks
/// This method will leak the parsed or the default value.
fn var_or_else<Parsed: Into<Box<R>> + FromStr, R: ?Sized, V: FnOnce() -> Parsed>(
  name: &'static str,
  default: V,
) -> &'static R
where
  Box<R>: TryFrom<Parsed>,
{
  var_or::<Parsed, R>(name, Box::leak(default().into()))
}

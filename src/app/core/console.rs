use std::io::Write;

use services::{
  notify::{Notice, NoticeKind, Notifier},
  view::{CommitControl, FeedSelector, FollowControl, ProfileView, Screen},
};
use tracing::{Level, event};

/// Prints notices inline with the command output.
pub struct ConsoleNotifier;
impl Notifier for ConsoleNotifier {
  fn notify(&self, notice: Notice) {
    let tag = match notice.kind {
      NoticeKind::Success => "ok",
      NoticeKind::Error => "error",
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "[{tag}] {}", notice.message) {
      event!(Level::WARN, "Failed to print notice: {e}");
    }
  }
}

pub fn render(screen: &Screen) -> String {
  match screen {
    Screen::Loading => "Loading...".to_owned(),
    Screen::NotFound => "User not found.".to_owned(),
    Screen::Failed(failure) => format!("Failed to load profile: {failure}"),
    Screen::Loaded(view) => render_profile(view),
  }
}

fn render_profile(view: &ProfileView) -> String {
  let profile = &view.profile;
  let mut lines = vec![format!("{} (@{})", profile.full_name, profile.username)];
  if !profile.bio.is_empty() {
    lines.push(profile.bio.clone());
  }
  if let Some(link) = &view.link {
    lines.push(format!("Link: {link}"));
  }
  lines.push(view.member_since.clone());
  lines.push(format!(
    "{} Following  {} Followers",
    view.following_count, view.followers_count
  ));
  lines.push(format!("Cover: {}", image_label(&view.cover_src)));
  lines.push(format!("Avatar: {}", image_label(&view.avatar_src)));

  let mut controls = Vec::new();
  if view.can_edit {
    controls.push("[edit profile]");
  }
  match view.follow {
    Some(FollowControl::Follow) => controls.push("[follow]"),
    Some(FollowControl::Unfollow) => controls.push("[unfollow]"),
    Some(FollowControl::Busy) => controls.push("[...]"),
    None => {}
  }
  match view.commit {
    Some(CommitControl::Update) => controls.push("[update]"),
    Some(CommitControl::Updating) => controls.push("[updating...]"),
    None => {}
  }
  if !controls.is_empty() {
    lines.push(controls.join(" "));
  }

  lines.push(format!("Feed: {}", feed_name(view.feed)));
  lines.join("\n")
}

/// Staged images are whole `data:` URLs, far too long to print.
fn image_label(src: &str) -> String {
  src.strip_prefix("data:").map_or_else(
    || src.to_owned(),
    |rest| {
      let mime = rest.split_once(';').map_or(rest, |(mime, _)| mime);
      format!("staged {mime} (not uploaded)")
    },
  )
}

pub const fn feed_name(feed: FeedSelector) -> &'static str {
  match feed {
    FeedSelector::Posts => "posts",
    FeedSelector::Likes => "likes",
  }
}

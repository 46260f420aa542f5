use std::path::PathBuf;

use services::{
  edit_buffer::MediaSlot,
  mutations::{MutationOutcome, Precondition},
  screen::ProfileScreen,
  view::FeedSelector,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, event};
use types::Handle;

use crate::console::{feed_name, render};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
  Help,
  Open(Handle),
  Show,
  Follow,
  Stage(MediaSlot, PathBuf),
  Clear,
  Commit,
  Feed(FeedSelector),
  Refresh,
  Quit,
  Invalid(String),
}

static AVAILABLE_COMMANDS: &str = "Available commands:
  - `open <handle>`
  - `show`
  - `follow`
  - `cover <path>` / `avatar <path>`
  - `clear`
  - `commit`
  - `feed posts|likes`
  - `refresh`
  - `quit`";

static NO_PROFILE: &str = "Open a profile first.";

/// Reads commands from stdin until EOF or `quit`.
pub async fn listen(screen: &ProfileScreen) {
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut stdout = tokio::io::stdout();

  loop {
    let line = match lines.next_line().await {
      Ok(Some(line)) => line,
      Ok(None) => {
        event!(Level::INFO, "Input closed.");
        break;
      }
      Err(e) => {
        event!(Level::ERROR, "Failed to read input: {e}");
        break;
      }
    };
    let Some(command) = parse_command(&line) else {
      continue;
    };
    if command == Command::Quit {
      break;
    }

    let output = issue_command(command, screen).await;
    let written = async {
      stdout.write_all(output.as_bytes()).await?;
      stdout.write_all(b"\n").await?;
      stdout.flush().await
    };
    if let Err(e) = written.await {
      event!(Level::ERROR, "Failed to write output: {e}");
      break;
    }
  }
}

/// `None` for blank lines.
pub fn parse_command(line: &str) -> Option<Command> {
  let mut parts = line.split_whitespace();
  let command = parts.next()?.to_lowercase();
  let argument = parts.next();

  let res = match (command.as_str(), argument) {
    ("help", _) => Command::Help,
    ("open", Some(handle)) => Command::Open(handle.trim_start_matches('@').into()),
    ("show", _) => Command::Show,
    ("follow" | "unfollow", _) => Command::Follow,
    ("cover", Some(path)) => Command::Stage(MediaSlot::Cover, path.into()),
    ("avatar", Some(path)) => Command::Stage(MediaSlot::Avatar, path.into()),
    ("clear", _) => Command::Clear,
    ("commit", _) => Command::Commit,
    ("feed", Some("posts")) => Command::Feed(FeedSelector::Posts),
    ("feed", Some("likes")) => Command::Feed(FeedSelector::Likes),
    ("refresh", _) => Command::Refresh,
    ("quit" | "exit", _) => Command::Quit,
    ("open" | "cover" | "avatar" | "feed", _) => {
      Command::Invalid(format!("Missing or invalid argument for `{command}`."))
    }
    _ => Command::Invalid(
      "Invalid command. You can get a list of available commands with `help`.".to_owned(),
    ),
  };
  Some(res)
}

pub async fn issue_command(command: Command, screen: &ProfileScreen) -> String {
  match command {
    Command::Help => AVAILABLE_COMMANDS.to_owned(),
    Command::Open(handle) => {
      screen.open(handle).await;
      render(&screen.render().await)
    }
    Command::Show => render(&screen.render().await),
    Command::Follow => match screen.toggle_follow().await {
      MutationOutcome::Succeeded => render(&screen.render().await),
      outcome => describe(&outcome),
    },
    Command::Stage(slot, path) => {
      let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => return format!("Could not read {}: {e}", path.display()),
      };
      if screen.stage(slot, &bytes).await {
        render(&screen.render().await)
      } else {
        "Nothing staged: empty file, or not your profile.".to_owned()
      }
    }
    Command::Clear => {
      screen.clear_edits().await;
      render(&screen.render().await)
    }
    Command::Commit => match screen.commit_edits().await {
      MutationOutcome::Succeeded => render(&screen.render().await),
      outcome => describe(&outcome),
    },
    Command::Feed(feed) => {
      screen.select_feed(feed).await;
      screen.feed_query().await.map_or_else(
        || NO_PROFILE.to_owned(),
        |query| format!("Showing {} of @{}.", feed_name(query.feed), query.handle),
      )
    }
    Command::Refresh => {
      if screen.route().await.is_none() {
        return NO_PROFILE.to_owned();
      }
      screen.refresh().await;
      render(&screen.render().await)
    }
    Command::Invalid(message) => message,
    Command::Quit => String::new(),
  }
}

fn describe(outcome: &MutationOutcome) -> String {
  match outcome {
    MutationOutcome::Succeeded => "Done.".to_owned(),
    // Already printed by the notifier.
    MutationOutcome::Failed(_) => String::new(),
    MutationOutcome::Busy => "Still working on the previous request.".to_owned(),
    MutationOutcome::Rejected(Precondition::NotSignedIn) => "Sign in first.".to_owned(),
    MutationOutcome::Rejected(Precondition::NotLoaded) => NO_PROFILE.to_owned(),
    MutationOutcome::Rejected(Precondition::OwnProfile) => {
      "You can't follow yourself.".to_owned()
    }
    MutationOutcome::Rejected(Precondition::NothingStaged) => "Nothing to update.".to_owned(),
  }
}

mod common;

use api::testing::{Call, Gate};
use common::{PNG, count, harness, loaded, until_called};
use services::{
  edit_buffer::MediaSlot,
  mutations::{MutationFailure, MutationOutcome, PROFILE_UPDATED, Precondition},
  notify::{Notice, NoticeKind},
  view::{
    CommitControl, DEFAULT_AVATAR, DEFAULT_COVER, FeedQuery, FeedSelector, FollowControl, Screen,
  },
};

#[tokio::test]
async fn renders_loading_before_anything_is_opened() {
  let h = harness(Some("u1")).await;
  assert_eq!(h.screen.render().await, Screen::Loading);
  assert_eq!(h.screen.feed_query().await, None);
}

#[tokio::test]
async fn late_response_for_previous_handle_is_dropped() {
  let h = harness(Some("u1")).await;
  let alice = h.fake.hold(Gate::Profile("alice".into()));

  let screen = h.screen.clone();
  let first = tokio::spawn(async move { screen.open("alice".into()).await });
  until_called(&h.fake, &Call::Profile("alice".into())).await;
  assert_eq!(h.screen.render().await, Screen::Loading);

  assert!(h.screen.open("bob".into()).await.is_some());
  alice.notify_one();
  assert_eq!(first.await.unwrap(), None);

  let view = loaded(&h.screen).await;
  assert_eq!(&*view.profile.username, "bob");
}

#[tokio::test]
async fn unknown_handle_and_failed_fetch() {
  let h = harness(Some("u1")).await;

  h.screen.open("nobody".into()).await;
  assert_eq!(h.screen.render().await, Screen::NotFound);

  h.fake.fail_profile("bob");
  h.screen.open("bob".into()).await;
  assert!(matches!(h.screen.render().await, Screen::Failed(_)));
}

#[tokio::test]
async fn loaded_view_shows_defaults_and_join_date() {
  let h = harness(Some("u1")).await;
  h.screen.open("bob".into()).await;

  let view = loaded(&h.screen).await;
  assert_eq!(view.cover_src, DEFAULT_COVER);
  assert_eq!(view.avatar_src, DEFAULT_AVATAR);
  assert_eq!(view.link, None);
  assert_eq!(view.member_since, "Joined July 2024");
  assert_eq!((view.following_count, view.followers_count), (0, 0));
  assert_eq!(view.feed, FeedSelector::Posts);
}

#[tokio::test]
async fn follow_then_unfollow() {
  let h = harness(Some("u1")).await;
  h.screen.open("bob".into()).await;

  let view = loaded(&h.screen).await;
  assert_eq!(view.follow, Some(FollowControl::Follow));
  assert_eq!(view.followers_count, 0);

  assert_eq!(h.screen.toggle_follow().await, MutationOutcome::Succeeded);
  let view = loaded(&h.screen).await;
  assert_eq!(view.follow, Some(FollowControl::Unfollow));
  assert_eq!(view.followers_count, 1);

  assert_eq!(h.screen.toggle_follow().await, MutationOutcome::Succeeded);
  let view = loaded(&h.screen).await;
  assert_eq!(view.follow, Some(FollowControl::Follow));
  assert_eq!(view.followers_count, 0);
  assert!(h.notices.notices().is_empty());
}

#[tokio::test]
async fn double_click_sends_one_request() {
  let h = harness(Some("u1")).await;
  h.screen.open("bob".into()).await;
  let gate = h.fake.hold(Gate::ToggleFollow);
  let call = Call::ToggleFollow("u2".into());

  let screen = h.screen.clone();
  let first = tokio::spawn(async move { screen.toggle_follow().await });
  until_called(&h.fake, &call).await;

  assert_eq!(loaded(&h.screen).await.follow, Some(FollowControl::Busy));
  assert_eq!(h.screen.toggle_follow().await, MutationOutcome::Busy);
  gate.notify_one();

  assert_eq!(first.await.unwrap(), MutationOutcome::Succeeded);
  assert_eq!(count(&h.fake, &call), 1);
  assert_eq!(loaded(&h.screen).await.follow, Some(FollowControl::Unfollow));
}

#[tokio::test]
async fn failed_toggle_keeps_relationship_and_notifies() {
  let h = harness(Some("u1")).await;
  h.screen.open("bob".into()).await;
  h.fake.fail_follow("Rate limited");

  assert_eq!(
    h.screen.toggle_follow().await,
    MutationOutcome::Failed(MutationFailure("Rate limited".into()))
  );
  let view = loaded(&h.screen).await;
  assert_eq!(view.follow, Some(FollowControl::Follow));
  assert_eq!(view.followers_count, 0);
  assert_eq!(h.notices.notices(), [Notice::error("Rate limited")]);
}

#[tokio::test]
async fn own_profile_is_editable_and_not_followable() {
  let h = harness(Some("u1")).await;

  h.screen.open("alice".into()).await;
  let view = loaded(&h.screen).await;
  assert!(view.can_edit);
  assert_eq!(view.follow, None);
  assert_eq!(
    h.screen.toggle_follow().await,
    MutationOutcome::Rejected(Precondition::OwnProfile)
  );

  h.screen.open("bob".into()).await;
  let view = loaded(&h.screen).await;
  assert!(!view.can_edit);
  assert!(!h.screen.stage(MediaSlot::Cover, PNG).await);
  assert_eq!(loaded(&h.screen).await.commit, None);
}

#[tokio::test]
async fn anonymous_viewer_gets_no_controls() {
  let h = harness(None).await;
  h.screen.open("bob".into()).await;

  let view = loaded(&h.screen).await;
  assert!(!view.can_edit);
  assert_eq!(view.follow, None);
  assert_eq!(
    h.screen.toggle_follow().await,
    MutationOutcome::Rejected(Precondition::NotSignedIn)
  );
  assert_eq!(count(&h.fake, &Call::ToggleFollow("u2".into())), 0);
}

#[tokio::test]
async fn toggle_before_load_is_refused() {
  let h = harness(Some("u1")).await;
  assert_eq!(
    h.screen.toggle_follow().await,
    MutationOutcome::Rejected(Precondition::NotLoaded)
  );
}

#[tokio::test]
async fn staging_previews_locally_and_clear_sends_nothing() {
  let h = harness(Some("u1")).await;
  h.screen.open("alice".into()).await;
  let before = h.fake.calls();

  assert!(h.screen.stage_cover(PNG).await);
  let view = loaded(&h.screen).await;
  assert!(view.cover_src.starts_with("data:image/png;base64,"));
  assert_eq!(view.avatar_src, DEFAULT_AVATAR);
  assert_eq!(view.commit, Some(CommitControl::Update));
  assert_eq!(view.profile.cover(), None);

  assert!(!h.screen.stage_avatar(b"").await);
  assert_eq!(loaded(&h.screen).await.avatar_src, DEFAULT_AVATAR);

  h.screen.clear_edits().await;
  let view = loaded(&h.screen).await;
  assert_eq!(view.cover_src, DEFAULT_COVER);
  assert_eq!(view.commit, None);
  assert_eq!(h.fake.calls(), before);
}

#[tokio::test]
async fn commit_uploads_reloads_and_notifies_once() {
  let h = harness(Some("u1")).await;
  h.screen.open("alice".into()).await;
  assert!(h.screen.stage_avatar(PNG).await);

  assert_eq!(h.screen.commit_edits().await, MutationOutcome::Succeeded);
  assert!(!h.screen.has_pending_edits().await);
  assert_eq!(count(&h.fake, &Call::Profile("alice".into())), 2);

  let view = loaded(&h.screen).await;
  assert_eq!(view.avatar_src, "https://cdn.example/avatar-1.png");
  assert_eq!(view.cover_src, DEFAULT_COVER);
  assert_eq!(view.commit, None);
  assert_eq!(
    h.notices.notices(),
    [Notice {
      kind: NoticeKind::Success,
      message: PROFILE_UPDATED.into(),
    }]
  );
}

#[tokio::test]
async fn commit_control_shows_updating_while_in_flight() {
  let h = harness(Some("u1")).await;
  h.screen.open("alice".into()).await;
  h.screen.stage(MediaSlot::Cover, PNG).await;
  let gate = h.fake.hold(Gate::UpdateProfile);

  let screen = h.screen.clone();
  let commit = tokio::spawn(async move { screen.commit_edits().await });
  while !h
    .fake
    .calls()
    .iter()
    .any(|call| matches!(call, Call::UpdateProfile(_)))
  {
    tokio::task::yield_now().await;
  }

  assert_eq!(
    loaded(&h.screen).await.commit,
    Some(CommitControl::Updating)
  );
  assert_eq!(h.screen.commit_edits().await, MutationOutcome::Busy);
  gate.notify_one();

  assert_eq!(commit.await.unwrap(), MutationOutcome::Succeeded);
  assert_eq!(loaded(&h.screen).await.commit, None);
}

#[tokio::test]
async fn failed_commit_still_discards_edits() {
  let h = harness(Some("u1")).await;
  h.screen.open("alice".into()).await;
  h.screen.stage(MediaSlot::Cover, PNG).await;
  h.fake.fail_update("Upload too large");

  assert_eq!(
    h.screen.commit_edits().await,
    MutationOutcome::Failed(MutationFailure("Upload too large".into()))
  );
  assert!(!h.screen.has_pending_edits().await);
  assert_eq!(h.notices.notices(), [Notice::error("Upload too large")]);
  assert_eq!(loaded(&h.screen).await.cover_src, DEFAULT_COVER);
}

#[tokio::test]
async fn navigating_away_drops_staged_edits() {
  let h = harness(Some("u1")).await;
  h.screen.open("alice".into()).await;
  h.screen.stage(MediaSlot::Cover, PNG).await;

  h.screen.open("bob".into()).await;
  h.screen.open("alice".into()).await;
  assert!(!h.screen.has_pending_edits().await);
  assert_eq!(
    h.screen.commit_edits().await,
    MutationOutcome::Rejected(Precondition::NothingStaged)
  );
}

#[tokio::test]
async fn switching_feed_fetches_nothing() {
  let h = harness(Some("u1")).await;
  h.screen.open("bob".into()).await;
  let before = h.fake.calls();

  h.screen.select_feed(FeedSelector::Likes).await;
  assert_eq!(loaded(&h.screen).await.feed, FeedSelector::Likes);
  assert_eq!(
    h.screen.feed_query().await,
    Some(FeedQuery {
      feed: FeedSelector::Likes,
      handle: "bob".into(),
      profile_id: Some("u2".into()),
    })
  );
  assert_eq!(h.fake.calls(), before);
}

#[tokio::test]
async fn route_follows_the_latest_open() {
  let h = harness(Some("u1")).await;
  let alice = h.fake.hold(Gate::Profile("alice".into()));

  let screen = h.screen.clone();
  let first = tokio::spawn(async move { screen.open("alice".into()).await });
  until_called(&h.fake, &Call::Profile("alice".into())).await;
  h.screen.open("bob".into()).await;
  alice.notify_one();
  assert_eq!(first.await.unwrap(), None);

  assert_eq!(h.screen.route().await.as_deref(), Some("bob"));
  h.screen.refresh().await;
  assert_eq!(count(&h.fake, &Call::Profile("bob".into())), 2);
  assert_eq!(count(&h.fake, &Call::Profile("alice".into())), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_opens_settle_on_the_routed_handle() {
  for _ in 0..50 {
    let h = harness(Some("u1")).await;
    let (a, b) = (h.screen.clone(), h.screen.clone());
    let (first, second) = tokio::join!(
      tokio::spawn(async move { a.open("alice".into()).await }),
      tokio::spawn(async move { b.open("bob".into()).await })
    );
    first.unwrap();
    second.unwrap();

    let route = h.screen.route().await.unwrap();
    let view = loaded(&h.screen).await;
    assert_eq!(view.profile.username, route);
  }
}

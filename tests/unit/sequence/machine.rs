use super::*;
use crate::foundation::core::Landmark;

const GRACE: Duration = Duration::from_millis(500);
const PERIOD: Duration = Duration::from_millis(100);

fn frames(n: usize) -> Vec<Frame> {
    (0..n)
        .map(|i| Frame::new(vec![Landmark::new(i as f64, 0.0, 0.0)]))
        .collect()
}

fn inline(label: &str, n: usize) -> Sign {
    Sign {
        label: label.to_string(),
        content: SignContent::InlineLandmarks { frames: frames(n) },
    }
}

fn remote(label: &str, uri: &str) -> Sign {
    Sign {
        label: label.to_string(),
        content: SignContent::RemoteLandmarks {
            uri: uri.to_string(),
        },
    }
}

fn video(label: &str, uri: &str) -> Sign {
    Sign {
        label: label.to_string(),
        content: SignContent::Video {
            uri: uri.to_string(),
        },
    }
}

fn placeholder(label: &str) -> Sign {
    Sign {
        label: label.to_string(),
        content: SignContent::PlaceholderMissing,
    }
}

fn cfg() -> SequencerConfig {
    SequencerConfig {
        rate: FrameRate { per_second: 10 },
        grace_delay: GRACE,
        eos_tolerance: Duration::from_millis(100),
        base_url: None,
    }
}

fn seq(signs: Vec<Sign>) -> SignSequencer {
    SignSequencer::new(signs, cfg())
}

fn fetch_token(effects: &[Effect]) -> Generation {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::FetchLandmarks { token, .. } => Some(*token),
            _ => None,
        })
        .expect("expected a FetchLandmarks effect")
}

fn video_token(effects: &[Effect]) -> Generation {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::VideoInitialize { token, .. } => Some(*token),
            _ => None,
        })
        .expect("expected a VideoInitialize effect")
}

#[test]
fn empty_list_goes_straight_to_all_played() {
    let mut s = seq(Vec::new());
    let effects = s.start(Instant::now());
    assert_eq!(s.state(), PlaybackState::AllPlayed);
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::Announce { .. })));
}

#[test]
fn start_twice_is_ignored() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("a", 2)]);
    s.start(t0);
    assert_eq!(s.state(), PlaybackState::Playing(0));
    assert!(s.start(t0).is_empty());
    assert_eq!(s.state(), PlaybackState::Playing(0));
}

#[test]
fn inline_sign_plays_and_auto_advances_to_all_played() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("a", 3)]);
    s.start(t0);
    assert_eq!(s.state(), PlaybackState::Playing(0));
    assert_eq!(s.current_label(), Some("a"));
    assert!(s.current_frame().is_some());

    s.tick(t0 + PERIOD);
    assert_eq!(s.state(), PlaybackState::Playing(0));

    s.tick(t0 + 2 * PERIOD);
    assert_eq!(s.state(), PlaybackState::Completed(0));

    // Not yet due.
    s.tick(t0 + 2 * PERIOD + GRACE - Duration::from_millis(1));
    assert_eq!(s.state(), PlaybackState::Completed(0));

    s.tick(t0 + 2 * PERIOD + GRACE);
    assert_eq!(s.state(), PlaybackState::AllPlayed);

    // Terminal: further ticks change nothing.
    assert!(s.tick(t0 + Duration::from_secs(60)).is_empty());
    assert_eq!(s.state(), PlaybackState::AllPlayed);
}

#[test]
fn sequence_advances_one_index_at_a_time() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("a", 1), placeholder("b"), inline("c", 1)]);
    s.start(t0);

    let mut seen = vec![s.state()];
    let mut t = t0;
    for _ in 0..200 {
        t += Duration::from_millis(50);
        s.tick(t);
        if seen.last() != Some(&s.state()) {
            seen.push(s.state());
        }
        if s.state() == PlaybackState::AllPlayed {
            break;
        }
    }

    assert_eq!(
        seen,
        vec![
            PlaybackState::Playing(0),
            PlaybackState::Completed(0),
            PlaybackState::Stalled(1),
            PlaybackState::Playing(2),
            PlaybackState::Completed(2),
            PlaybackState::AllPlayed,
        ]
    );
}

#[test]
fn placeholder_stalls_with_message_and_no_fetch() {
    let t0 = Instant::now();
    let mut s = seq(vec![placeholder("missing-word")]);
    let effects = s.start(t0);

    assert_eq!(s.state(), PlaybackState::Stalled(0));
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::FetchLandmarks { .. })));
    let announced = effects
        .iter()
        .find_map(|e| match e {
            Effect::Announce { message } => Some(message.clone()),
            _ => None,
        })
        .unwrap();
    assert!(announced.contains("missing-word"));
    assert!(announced.contains("not available"));
    assert_eq!(s.status_message(), Some(announced.as_str()));

    s.tick(t0 + GRACE);
    assert_eq!(s.state(), PlaybackState::AllPlayed);
}

#[test]
fn empty_inline_frames_stall() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("empty", 0)]);
    s.start(t0);
    assert_eq!(s.state(), PlaybackState::Stalled(0));
    assert!(s.current_frame().is_none());
}

#[test]
fn remote_sign_emits_fetch_and_plays_on_delivery() {
    let t0 = Instant::now();
    let mut s = seq(vec![remote("z", "https://host/z.json")]);
    let effects = s.start(t0);
    assert_eq!(s.state(), PlaybackState::Loading(0));
    let token = fetch_token(&effects);

    let effects = s.on_landmarks(token, Ok(frames(2)), t0);
    assert!(effects.is_empty());
    assert_eq!(s.state(), PlaybackState::Playing(0));
}

#[test]
fn fetch_failure_stalls_with_announcement() {
    let t0 = Instant::now();
    let mut s = seq(vec![remote("z", "https://host/z.json")]);
    let token = fetch_token(&s.start(t0));

    let effects = s.on_landmarks(
        token,
        Err(SignplayError::fetch("GET https://host/z.json: status 404")),
        t0,
    );
    assert_eq!(s.state(), PlaybackState::Stalled(0));
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::Announce { message } if message.contains("404"))));

    s.tick(t0 + GRACE);
    assert_eq!(s.state(), PlaybackState::AllPlayed);
}

#[test]
fn stale_fetch_result_is_a_silent_no_op() {
    let t0 = Instant::now();
    let mut s = seq(vec![
        remote("z1", "https://host/z1.json"),
        remote("z2", "https://host/z2.json"),
    ]);
    let old_token = fetch_token(&s.start(t0));
    s.on_landmarks(old_token, Ok(frames(2)), t0);
    assert_eq!(s.state(), PlaybackState::Playing(0));

    // Skipping ahead bumps the generation; a late duplicate of the first
    // fetch must not touch the new index.
    let new_token = fetch_token(&s.next(t0));
    assert_ne!(old_token, new_token);
    assert_eq!(s.state(), PlaybackState::Loading(1));

    let effects = s.on_landmarks(old_token, Ok(frames(5)), t0);
    assert!(effects.is_empty());
    assert_eq!(s.state(), PlaybackState::Loading(1));

    s.on_landmarks(new_token, Ok(frames(2)), t0);
    assert_eq!(s.state(), PlaybackState::Playing(1));
}

#[test]
fn video_ready_plays_then_ends() {
    let t0 = Instant::now();
    let mut s = seq(vec![video("x", "https://host/a.mp4")]);
    let effects = s.start(t0);
    assert_eq!(s.state(), PlaybackState::Loading(0));
    let token = video_token(&effects);

    let effects = s.on_video_event(token, VideoEvent::Ready, t0);
    assert_eq!(s.state(), PlaybackState::Playing(0));
    assert!(effects.contains(&Effect::VideoPlay));

    s.on_video_event(token, VideoEvent::Ended, t0);
    assert_eq!(s.state(), PlaybackState::Completed(0));

    let effects = s.tick(t0 + GRACE);
    assert_eq!(s.state(), PlaybackState::AllPlayed);
    // The delegate's handle is released on the way out.
    assert!(effects.contains(&Effect::VideoDispose));
}

#[test]
fn video_end_of_stream_by_position_polling() {
    let t0 = Instant::now();
    let mut s = seq(vec![video("x", "https://host/a.mp4")]);
    let token = video_token(&s.start(t0));
    s.on_video_event(token, VideoEvent::Ready, t0);

    s.on_video_event(
        token,
        VideoEvent::Progress {
            position: Duration::from_millis(4800),
            duration: Duration::from_millis(5000),
        },
        t0,
    );
    assert_eq!(s.state(), PlaybackState::Playing(0));

    s.on_video_event(
        token,
        VideoEvent::Progress {
            position: Duration::from_millis(4950),
            duration: Duration::from_millis(5000),
        },
        t0,
    );
    assert_eq!(s.state(), PlaybackState::Completed(0));
}

#[test]
fn video_failure_stalls() {
    let t0 = Instant::now();
    let mut s = seq(vec![video("x", "bad://uri"), inline("a", 1)]);
    let token = video_token(&s.start(t0));

    s.on_video_event(token, VideoEvent::Failed("unsupported codec".to_string()), t0);
    assert_eq!(s.state(), PlaybackState::Stalled(0));

    // Advancing tears down the dead video handle first.
    let effects = s.tick(t0 + GRACE);
    assert!(effects.contains(&Effect::VideoDispose));
    assert_eq!(s.state(), PlaybackState::Playing(1));
}

#[test]
fn relative_uris_resolve_against_base_url() {
    let t0 = Instant::now();
    let mut cfg = cfg();
    cfg.base_url = Some("http://127.0.0.1:5000/".to_string());
    let mut s = SignSequencer::new(vec![video("x", "/media/a.mp4")], cfg);
    let effects = s.start(t0);
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::VideoInitialize { uri, .. } if uri == "http://127.0.0.1:5000/media/a.mp4"
    )));
}

#[test]
fn absolute_uris_are_left_alone() {
    let t0 = Instant::now();
    let mut cfg = cfg();
    cfg.base_url = Some("http://127.0.0.1:5000".to_string());
    let mut s = SignSequencer::new(vec![remote("z", "https://cdn/z.json")], cfg);
    let effects = s.start(t0);
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::FetchLandmarks { uri, .. } if uri == "https://cdn/z.json"
    )));
}

#[test]
fn manual_controls_respect_bounds() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("a", 2), inline("b", 2)]);
    s.start(t0);

    // previous at index 0 is a no-op.
    assert!(s.previous(t0).is_empty());
    assert_eq!(s.state(), PlaybackState::Playing(0));

    s.next(t0);
    assert_eq!(s.state(), PlaybackState::Playing(1));

    // next at the last index is a no-op.
    assert!(s.next(t0).is_empty());
    assert_eq!(s.state(), PlaybackState::Playing(1));

    s.previous(t0);
    assert_eq!(s.state(), PlaybackState::Playing(0));
}

#[test]
fn manual_controls_are_no_ops_while_loading_and_when_terminal() {
    let t0 = Instant::now();
    let mut s = seq(vec![remote("z", "https://host/z.json"), inline("a", 1)]);
    s.start(t0);
    assert_eq!(s.state(), PlaybackState::Loading(0));

    assert!(s.next(t0).is_empty());
    assert!(s.previous(t0).is_empty());
    assert!(s.restart_current(t0).is_empty());
    assert_eq!(s.state(), PlaybackState::Loading(0));

    // Idle: no current index, nothing to jump to.
    let mut idle = seq(vec![inline("a", 1)]);
    assert!(idle.next(t0).is_empty());
    assert!(idle.restart_current(t0).is_empty());
    assert_eq!(idle.state(), PlaybackState::Idle);
}

#[test]
fn restart_current_resets_the_frame_pointer() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("a", 3)]);
    s.start(t0);
    s.tick(t0 + PERIOD);
    assert_eq!(s.current_frame().unwrap().points[0].x, 1.0);

    let t1 = t0 + Duration::from_millis(250);
    s.restart_current(t1);
    assert_eq!(s.state(), PlaybackState::Playing(0));
    assert_eq!(s.current_frame().unwrap().points[0].x, 0.0);

    // The replay reproduces the original run.
    s.tick(t1 + PERIOD);
    s.tick(t1 + 2 * PERIOD);
    assert_eq!(s.state(), PlaybackState::Completed(0));
}

#[test]
fn all_played_is_terminal_until_restart_all() {
    let t0 = Instant::now();
    let mut s = seq(vec![inline("a", 1)]);
    s.start(t0);
    s.tick(t0 + PERIOD);
    s.tick(t0 + PERIOD + GRACE);
    assert_eq!(s.state(), PlaybackState::AllPlayed);

    assert!(s.next(t0).is_empty());
    assert!(s.previous(t0).is_empty());
    assert!(s.restart_current(t0).is_empty());
    assert_eq!(s.state(), PlaybackState::AllPlayed);

    let t1 = t0 + Duration::from_secs(5);
    s.restart_all(t1);
    assert_eq!(s.state(), PlaybackState::Playing(0));
}

use std::time::{Duration, Instant};

use crate::{
    animate::clock::LandmarkAnimator,
    foundation::core::{Frame, FrameRate, Generation},
    foundation::error::SignplayError,
    parse::response::{Sign, SignContent},
    sequence::video::VideoEvent,
};

/// Sequence position. At most one index is ever Loading/Playing; the index
/// changes only through a defined transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlaybackState {
    /// Not started.
    Idle,
    /// Resolving content for the index.
    Loading(usize),
    /// Content for the index is playing.
    Playing(usize),
    /// The index played to its natural end.
    Completed(usize),
    /// The index is unplayable; auto-advances after the grace delay.
    Stalled(usize),
    /// Terminal until a full restart.
    AllPlayed,
}

impl PlaybackState {
    /// Current sequence index, if one is active.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Loading(i) | Self::Playing(i) | Self::Completed(i) | Self::Stalled(i) => Some(i),
            Self::Idle | Self::AllPlayed => None,
        }
    }
}

/// Host-executed command emitted by the sequencer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Effect {
    /// Begin fetching a remote landmark document.
    FetchLandmarks {
        index: usize,
        uri: String,
        token: Generation,
    },
    /// Begin initializing the video delegate.
    VideoInitialize {
        index: usize,
        uri: String,
        token: Generation,
    },
    /// Play the initialized video once; no loop.
    VideoPlay,
    /// Release the video delegate's current source.
    VideoDispose,
    /// User-facing status message (stalls, empty sequence).
    Announce { message: String },
}

/// Sequencer configuration, injected at construction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SequencerConfig {
    /// Landmark animation rate.
    pub rate: FrameRate,
    /// Dwell in Completed/Stalled before auto-advancing.
    pub grace_delay: Duration,
    /// End-of-stream tolerance for video position polling.
    pub eos_tolerance: Duration,
    /// Base URL that backend-relative media paths resolve against.
    pub base_url: Option<String>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            rate: FrameRate { per_second: 12 },
            grace_delay: Duration::from_millis(1200),
            eos_tolerance: Duration::from_millis(100),
            base_url: None,
        }
    }
}

/// The single active content resource, exclusively owned by the sequencer.
enum ActiveContent {
    None,
    Animator(LandmarkAnimator),
    Video,
}

/// State machine ordering and advancing through a sign list.
///
/// Sans-IO: mutating calls take the current instant and return the effects
/// the host must execute. Completions come back through [`on_landmarks`] and
/// [`on_video_event`] carrying the generation token issued at `Loading`
/// entry; a completion with a stale token is a silent no-op.
///
/// [`on_landmarks`]: SignSequencer::on_landmarks
/// [`on_video_event`]: SignSequencer::on_video_event
pub struct SignSequencer {
    signs: Vec<Sign>,
    cfg: SequencerConfig,
    state: PlaybackState,
    generation: Generation,
    active: ActiveContent,
    advance_at: Option<Instant>,
    status: Option<String>,
}

impl SignSequencer {
    pub fn new(signs: Vec<Sign>, cfg: SequencerConfig) -> Self {
        Self {
            signs,
            cfg,
            state: PlaybackState::Idle,
            generation: Generation::default(),
            active: ActiveContent::None,
            advance_at: None,
            status: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn sign_count(&self) -> usize {
        self.signs.len()
    }

    /// Label of the sign at the current index.
    pub fn current_label(&self) -> Option<&str> {
        self.state
            .index()
            .and_then(|i| self.signs.get(i))
            .map(|s| s.label.as_str())
    }

    /// Frame the presentation layer should render right now, when the active
    /// content is a landmark animation.
    pub fn current_frame(&self) -> Option<&Frame> {
        match &self.active {
            ActiveContent::Animator(a) => Some(a.current_frame()),
            _ => None,
        }
    }

    /// User-facing message for the current stall, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Begin playback from index 0. Only meaningful from `Idle`; an empty
    /// sign list goes straight to `AllPlayed` with a notice.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self, now: Instant) -> Vec<Effect> {
        if self.state != PlaybackState::Idle {
            tracing::warn!(state = ?self.state, "start ignored: sequence already started");
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.signs.is_empty() {
            self.state = PlaybackState::AllPlayed;
            effects.push(Effect::Announce {
                message: "nothing to play: the translation produced no signs".to_string(),
            });
            return effects;
        }
        self.enter_loading(0, now, &mut effects);
        effects
    }

    /// Drive the animator clock and the grace-delay auto-advance.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state {
            PlaybackState::Playing(i) => {
                let completed = match &mut self.active {
                    ActiveContent::Animator(animator) => animator.poll(now).completed,
                    _ => false,
                };
                if completed {
                    tracing::info!(index = i, "landmark animation completed");
                    self.complete(i, now);
                }
            }
            PlaybackState::Stalled(i) | PlaybackState::Completed(i) => {
                if self.advance_at.is_some_and(|at| now >= at) {
                    if i + 1 < self.signs.len() {
                        self.enter_loading(i + 1, now, &mut effects);
                    } else {
                        self.finish(&mut effects);
                    }
                }
            }
            _ => {}
        }
        effects
    }

    /// Deliver a remote landmark fetch completion.
    pub fn on_landmarks(
        &mut self,
        token: Generation,
        result: Result<Vec<Frame>, SignplayError>,
        now: Instant,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if token != self.generation {
            tracing::trace!(?token, current = ?self.generation, "dropping stale fetch result");
            return effects;
        }
        let PlaybackState::Loading(i) = self.state else {
            return effects;
        };
        match result {
            Ok(frames) => self.play_landmarks(i, frames, now, &mut effects),
            Err(e) => self.stall(i, e.stall_message(), now, &mut effects),
        }
        effects
    }

    /// Deliver a video delegate event.
    pub fn on_video_event(
        &mut self,
        token: Generation,
        event: VideoEvent,
        now: Instant,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if token != self.generation {
            tracing::trace!(?token, current = ?self.generation, "dropping stale video event");
            return effects;
        }
        match (self.state, event) {
            (PlaybackState::Loading(i), VideoEvent::Ready) => {
                tracing::info!(index = i, "video ready, playing");
                self.state = PlaybackState::Playing(i);
                effects.push(Effect::VideoPlay);
            }
            (PlaybackState::Loading(i) | PlaybackState::Playing(i), VideoEvent::Failed(m)) => {
                self.stall(
                    i,
                    SignplayError::video_init(m).stall_message(),
                    now,
                    &mut effects,
                );
            }
            (PlaybackState::Playing(i), VideoEvent::Ended) => {
                tracing::info!(index = i, "video ended");
                self.complete(i, now);
            }
            (PlaybackState::Playing(i), VideoEvent::Progress { position, duration }) => {
                // End-of-stream by polling: remaining time under tolerance.
                if !duration.is_zero()
                    && duration.saturating_sub(position) < self.cfg.eos_tolerance
                {
                    tracing::info!(index = i, "video reached end of stream");
                    self.complete(i, now);
                }
            }
            _ => {}
        }
        effects
    }

    /// Advance to the next sign. No-op while loading, out of range, or
    /// without a current index.
    pub fn next(&mut self, now: Instant) -> Vec<Effect> {
        self.manual_jump(self.state.index().map(|i| i + 1), now)
    }

    /// Return to the previous sign. No-op while loading or at index 0.
    pub fn previous(&mut self, now: Instant) -> Vec<Effect> {
        self.manual_jump(self.state.index().and_then(|i| i.checked_sub(1)), now)
    }

    /// Replay the current sign from its beginning.
    pub fn restart_current(&mut self, now: Instant) -> Vec<Effect> {
        self.manual_jump(self.state.index(), now)
    }

    /// Restart the whole sequence from index 0; the only way out of
    /// `AllPlayed`.
    pub fn restart_all(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if matches!(self.state, PlaybackState::Loading(_)) {
            return effects;
        }
        if self.signs.is_empty() {
            return effects;
        }
        self.enter_loading(0, now, &mut effects);
        effects
    }

    fn manual_jump(&mut self, target: Option<usize>, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if matches!(self.state, PlaybackState::Loading(_)) {
            return effects;
        }
        let Some(target) = target else {
            return effects;
        };
        if target >= self.signs.len() {
            return effects;
        }
        self.enter_loading(target, now, &mut effects);
        effects
    }

    /// Tear down the previous index's resources, bump the generation so any
    /// in-flight completion goes stale, then resolve index `i`.
    fn enter_loading(&mut self, i: usize, now: Instant, effects: &mut Vec<Effect>) {
        self.teardown(effects);
        self.generation = self.generation.bump();
        self.state = PlaybackState::Loading(i);
        let token = self.generation;
        tracing::info!(index = i, ?token, label = %self.signs[i].label, "loading sign");

        match self.signs[i].content.clone() {
            SignContent::Video { uri } => {
                if uri.trim().is_empty() {
                    self.stall(
                        i,
                        SignplayError::unresolvable("empty video uri").stall_message(),
                        now,
                        effects,
                    );
                    return;
                }
                effects.push(Effect::VideoInitialize {
                    index: i,
                    uri: self.resolve_uri(&uri),
                    token,
                });
                self.active = ActiveContent::Video;
            }
            SignContent::InlineLandmarks { frames } => {
                self.play_landmarks(i, frames, now, effects);
            }
            SignContent::RemoteLandmarks { uri } => {
                if uri.trim().is_empty() {
                    self.stall(
                        i,
                        SignplayError::unresolvable("empty landmark uri").stall_message(),
                        now,
                        effects,
                    );
                    return;
                }
                effects.push(Effect::FetchLandmarks {
                    index: i,
                    uri: self.resolve_uri(&uri),
                    token,
                });
            }
            SignContent::PlaceholderMissing => {
                let label = self.signs[i].label.clone();
                self.stall(
                    i,
                    format!("sign for \"{label}\" is not available"),
                    now,
                    effects,
                );
            }
        }
    }

    fn play_landmarks(
        &mut self,
        i: usize,
        frames: Vec<Frame>,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) {
        if frames.is_empty() {
            self.stall(
                i,
                SignplayError::decode("landmark sequence is empty").stall_message(),
                now,
                effects,
            );
            return;
        }
        match LandmarkAnimator::new(frames, self.cfg.rate) {
            Ok(mut animator) => {
                animator.start(now);
                self.active = ActiveContent::Animator(animator);
                self.state = PlaybackState::Playing(i);
                tracing::info!(index = i, "landmark animation playing");
            }
            Err(e) => self.stall(i, e.stall_message(), now, effects),
        }
    }

    fn stall(&mut self, i: usize, message: String, now: Instant, effects: &mut Vec<Effect>) {
        tracing::warn!(index = i, %message, "sign stalled");
        self.state = PlaybackState::Stalled(i);
        self.status = Some(message.clone());
        self.advance_at = Some(now + self.cfg.grace_delay);
        effects.push(Effect::Announce { message });
    }

    fn complete(&mut self, i: usize, now: Instant) {
        self.state = PlaybackState::Completed(i);
        self.advance_at = Some(now + self.cfg.grace_delay);
    }

    fn finish(&mut self, effects: &mut Vec<Effect>) {
        self.teardown(effects);
        self.state = PlaybackState::AllPlayed;
        tracing::info!("all signs played");
    }

    /// Synchronous, idempotent release of the active content resource.
    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        match &mut self.active {
            ActiveContent::Animator(animator) => animator.stop(),
            ActiveContent::Video => effects.push(Effect::VideoDispose),
            ActiveContent::None => {}
        }
        self.active = ActiveContent::None;
        self.advance_at = None;
        self.status = None;
    }

    fn resolve_uri(&self, uri: &str) -> String {
        if uri.contains("://") {
            return uri.to_string();
        }
        match &self.cfg.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                uri.trim_start_matches('/')
            ),
            None => uri.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/machine.rs"]
mod tests;

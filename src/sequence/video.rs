use std::collections::VecDeque;
use std::time::Duration;

use crate::foundation::core::Generation;

/// Playback report from the external video collaborator, tagged with the
/// generation token it was initialized under.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VideoEvent {
    /// Initialization finished; the sequencer will request playback.
    Ready,
    /// Initialization or playback failed (bad URI, codec, network).
    Failed(String),
    /// Periodic position report used for end-of-stream polling.
    Progress {
        position: Duration,
        duration: Duration,
    },
    /// One-shot end-of-stream notification.
    Ended,
}

/// Host-side boundary to the opaque video player.
///
/// The sequencer never calls this trait itself; it emits
/// [`crate::Effect`] values which the host routes here, and routes the
/// events polled from here back into
/// [`crate::SignSequencer::on_video_event`].
pub trait VideoDelegate {
    /// Begin asynchronous initialization of `uri` under `token`.
    fn initialize(&mut self, uri: &str, token: Generation);
    /// Play the initialized source once; no loop.
    fn play(&mut self);
    /// Release the current source. Idempotent.
    fn dispose(&mut self);
    /// Drain at most one pending event.
    fn poll(&mut self) -> Option<(Generation, VideoEvent)>;
}

/// Delegate for hosts without video output: every initialization reports
/// failure, so video signs stall and the sequence advances past them.
#[derive(Debug, Default)]
pub struct NullVideoDelegate {
    pending: VecDeque<(Generation, VideoEvent)>,
}

impl VideoDelegate for NullVideoDelegate {
    fn initialize(&mut self, uri: &str, token: Generation) {
        tracing::debug!(%uri, ?token, "null video delegate refusing initialization");
        self.pending.push_back((
            token,
            VideoEvent::Failed("video playback is not available in this host".to_string()),
        ));
    }

    fn play(&mut self) {}

    fn dispose(&mut self) {
        self.pending.clear();
    }

    fn poll(&mut self) -> Option<(Generation, VideoEvent)> {
        self.pending.pop_front()
    }
}

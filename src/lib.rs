//! Signplay is a sign-language playback engine.
//!
//! It turns a translation backend's reply into a frame-accurate visual
//! performance: an ordered list of signs, each renderable as a video clip or
//! a skeletal landmark animation, with graceful fallback when content is
//! missing or unusable.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: untyped reply JSON -> ordered [`Sign`] list ([`parse_response`])
//! 2. **Sequence**: [`SignSequencer`] resolves each sign's content kind and
//!    owns the active video/animator resource, emitting [`Effect`]s the host
//!    executes
//! 3. **Animate**: [`LandmarkAnimator`] drives a polled frame clock over the
//!    sign's frames
//! 4. **Render**: [`render_frame`] normalizes the current [`Frame`] into
//!    canvas space and emits [`DrawOp`] commands for the presentation layer
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in the core**: fetch and video playback happen behind the
//!   [`LandmarkFetcher`] and [`VideoDelegate`] boundaries on the host's loop.
//! - **Deterministic-by-default**: the sequencer and animator are driven by
//!   explicit instants, never wall-clock reads of their own.
//! - **Generation-guarded async**: every completion carries the
//!   [`Generation`] token issued at `Loading` entry; stale results are
//!   silent no-ops.
#![forbid(unsafe_code)]

mod animate;
mod fetch;
mod foundation;
mod parse;
mod render;
mod sequence;

pub use animate::clock::{AnimatorPoll, LandmarkAnimator};
pub use fetch::http::{HttpLandmarkFetcher, LandmarkFetcher};
pub use foundation::core::{
    Canvas, Frame, FrameRate, Generation, Landmark, LandmarkLayout, Rgba8,
};
pub use foundation::error::{SignplayError, SignplayResult};
pub use parse::frames::{decode_frame_list, decode_landmark_document};
pub use parse::response::{ParseWarning, ParsedResponse, Sign, SignContent, parse_response};
pub use render::ops::DrawOp;
pub use render::skeleton::{
    HandStyle, RenderParams, SkeletonPalette, StylizedOptions, render_frame,
};
pub use sequence::machine::{Effect, PlaybackState, SequencerConfig, SignSequencer};
pub use sequence::video::{NullVideoDelegate, VideoDelegate, VideoEvent};

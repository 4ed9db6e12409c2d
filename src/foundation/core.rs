use std::time::Duration;

use crate::foundation::error::{SignplayError, SignplayResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

fn default_confidence() -> f64 {
    1.0
}

/// One tracked point (joint/fingertip) with position and confidence features.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Likelihood the point is visible; defaults to 1.0 when the source omits it.
    #[serde(default = "default_confidence")]
    pub visibility: f64,
    /// Likelihood the point exists in the frame; defaults to 1.0 when omitted.
    #[serde(default = "default_confidence")]
    pub presence: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
            presence: 1.0,
        }
    }

    /// 2D projection used by the renderer.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The complete landmark set for one animation instant.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Frame {
    pub points: Vec<Landmark>,
}

impl Frame {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box over the 2D projections of all points.
    /// `None` for an empty frame.
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        Some(rect)
    }
}

/// Layout descriptor partitioning a frame into a pose segment and hand segments.
///
/// A nominal frame holds `pose_points + hand_points * hands` landmarks. The
/// renderer restricts every lookup to the points actually present, so shorter
/// frames (a missing hand, say) degrade instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LandmarkLayout {
    /// Number of pose landmarks at the start of each frame.
    pub pose_points: usize,
    /// Landmarks per hand segment.
    pub hand_points: usize,
    /// Number of hand segments following the pose segment.
    pub hands: usize,
}

impl LandmarkLayout {
    pub fn new(pose_points: usize, hand_points: usize, hands: usize) -> SignplayResult<Self> {
        if hands > 0 && hand_points == 0 {
            return Err(SignplayError::validation(
                "LandmarkLayout hand_points must be > 0 when hands > 0",
            ));
        }
        if pose_points == 0 && hands == 0 {
            return Err(SignplayError::validation(
                "LandmarkLayout must describe at least one segment",
            ));
        }
        Ok(Self {
            pose_points,
            hand_points,
            hands,
        })
    }

    /// Single 21-point hand, no pose (the letter-sign deployment).
    pub fn hand_only() -> Self {
        Self {
            pose_points: 0,
            hand_points: 21,
            hands: 1,
        }
    }

    /// 33-point pose plus two 21-point hands (the holistic deployment).
    pub fn holistic_upper_body() -> Self {
        Self {
            pose_points: 33,
            hand_points: 21,
            hands: 2,
        }
    }

    pub fn points_per_frame(&self) -> usize {
        self.pose_points + self.hand_points * self.hands
    }

    /// Index range of hand segment `k`, unclipped.
    pub fn hand_range(&self, k: usize) -> std::ops::Range<usize> {
        let start = self.pose_points + k * self.hand_points;
        start..start + self.hand_points
    }
}

/// Target animation rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRate {
    pub per_second: u32, // must be >= 1
}

impl FrameRate {
    pub fn new(per_second: u32) -> SignplayResult<Self> {
        if per_second == 0 {
            return Err(SignplayError::validation("FrameRate must be >= 1"));
        }
        Ok(Self { per_second })
    }

    /// Tick period of the animation clock.
    pub fn frame_period(self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.per_second))
    }
}

/// Output canvas dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Straight-alpha RGBA8 color used by draw commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Token issued at each `Loading` entry; asynchronous completions are checked
/// against the current token before any state mutation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Generation(pub u64);

impl Generation {
    pub fn bump(self) -> Self {
        Self(self.0 + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

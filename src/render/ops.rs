use crate::foundation::core::{BezPath, Point, Rgba8};

/// Backend-agnostic draw command emitted by the skeletal renderer.
///
/// Commands are issued in paint order against an external canvas consumer;
/// the set matches the primitives the presentation layer contracts to supply
/// (line, circle, path fill, oval fill).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DrawOp {
    /// Stroked line segment.
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
    },
    /// Filled circle.
    Circle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    /// Filled Bezier path.
    FillPath { path: BezPath, color: Rgba8 },
    /// Filled axis-rotated oval.
    Oval {
        center: Point,
        rx: f64,
        ry: f64,
        rotation_rad: f64,
        color: Rgba8,
    },
}

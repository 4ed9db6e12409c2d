use crate::{
    foundation::core::{Canvas, Frame, LandmarkLayout, Point, Rect, Rgba8},
    render::hand,
    render::ops::DrawOp,
};

/// MediaPipe-style pose bone table (face outline, shoulders, arms, torso).
/// Connections whose endpoints fall outside the configured pose segment are
/// simply not drawn.
const POSE_CONNECTIONS: [(usize, usize); 17] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (12, 14),
    (14, 16),
    (11, 23),
    (12, 24),
    (23, 24),
];

/// Pose wrist landmark bridged to each hand segment's wrist, right hand first.
const POSE_WRISTS: [usize; 2] = [16, 15];

/// Hand rendering style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandStyle {
    /// Straight-line 21-point topology with uniform joint circles.
    #[default]
    Wire,
    /// Filled palm and tapered fingers instead of raw skeleton lines.
    Stylized,
}

/// Cosmetic passes applied in stylized mode; each individually toggleable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StylizedOptions {
    /// Offset translucent shadow copy beneath the hand.
    pub shadow: bool,
    /// Two-tone palm/finger gradient pass.
    pub two_tone: bool,
    /// Oval nails with a small highlight on the five fingertips.
    pub nails: bool,
    /// Faint joint dots at mid-finger segments.
    pub joint_dots: bool,
}

impl Default for StylizedOptions {
    fn default() -> Self {
        Self {
            shadow: true,
            two_tone: true,
            nails: true,
            joint_dots: true,
        }
    }
}

/// Colors used by the skeletal renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkeletonPalette {
    pub bone: Rgba8,
    pub joint: Rgba8,
    pub palm: Rgba8,
    pub palm_highlight: Rgba8,
    pub shadow: Rgba8,
    pub nail: Rgba8,
    pub nail_highlight: Rgba8,
    pub joint_dot: Rgba8,
}

impl Default for SkeletonPalette {
    fn default() -> Self {
        Self {
            bone: Rgba8::opaque(148, 163, 184),
            joint: Rgba8::opaque(56, 189, 248),
            palm: Rgba8::opaque(224, 172, 105),
            palm_highlight: Rgba8::opaque(240, 199, 148),
            shadow: Rgba8::new(15, 23, 42, 70),
            nail: Rgba8::opaque(244, 226, 205),
            nail_highlight: Rgba8::new(255, 255, 255, 170),
            joint_dot: Rgba8::new(120, 72, 28, 46),
        }
    }
}

/// Layout and styling inputs for [`render_frame`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderParams {
    pub canvas: Canvas,
    pub layout: LandmarkLayout,
    pub style: HandStyle,
    pub palette: SkeletonPalette,
    pub stylized: StylizedOptions,
}

impl RenderParams {
    pub fn new(canvas: Canvas, layout: LandmarkLayout) -> Self {
        Self {
            canvas,
            layout,
            style: HandStyle::default(),
            palette: SkeletonPalette::default(),
            stylized: StylizedOptions::default(),
        }
    }
}

/// Render one frame into draw commands.
///
/// Pure function of its inputs: normalizes raw coordinates into canvas space,
/// partitions points into pose and hand segments per the layout, and paints
/// skeleton or stylized-hand geometry. An empty frame, a zero-area bounding
/// box, or a zero-sized canvas yields no commands.
pub fn render_frame(frame: &Frame, params: &RenderParams) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    if params.canvas.width == 0 || params.canvas.height == 0 {
        return ops;
    }
    let Some(points) = normalize(frame, params.canvas) else {
        return ops;
    };

    let layout = params.layout;
    let unit = f64::from(params.canvas.width.min(params.canvas.height));
    let bone_width = (unit * 0.006).max(1.5);
    let joint_radius = (unit * 0.01).max(2.0);

    let pose_end = layout.pose_points.min(points.len());
    for &(a, b) in &POSE_CONNECTIONS {
        if a < pose_end && b < pose_end {
            ops.push(DrawOp::Line {
                from: points[a],
                to: points[b],
                width: bone_width,
                color: params.palette.bone,
            });
        }
    }
    for p in &points[..pose_end] {
        ops.push(DrawOp::Circle {
            center: *p,
            radius: joint_radius,
            color: params.palette.joint,
        });
    }

    for k in 0..layout.hands {
        let range = layout.hand_range(k);
        if range.start >= points.len() {
            break;
        }
        let hand = &points[range.start..range.end.min(points.len())];
        if hand.is_empty() {
            continue;
        }

        // The pose wrist to hand wrist bridge is skeleton detail; the
        // stylized silhouette covers that area itself.
        if params.style == HandStyle::Wire
            && let Some(&wrist) = POSE_WRISTS.get(k)
            && wrist < pose_end
        {
            ops.push(DrawOp::Line {
                from: points[wrist],
                to: hand[0],
                width: bone_width,
                color: params.palette.bone,
            });
        }

        match params.style {
            HandStyle::Wire => {
                hand::draw_wire(hand, bone_width, joint_radius, &params.palette, &mut ops);
            }
            HandStyle::Stylized => hand::draw_stylized(
                hand,
                f64::from(params.canvas.width),
                &params.palette,
                &params.stylized,
                &mut ops,
            ),
        }
    }

    ops
}

/// Map raw landmark coordinates into canvas space: pad the bounding box by
/// 10% of its width on each axis, fit uniformly at 80% of the canvas, and
/// center. `None` when the frame is empty or the raw box has zero area.
fn normalize(frame: &Frame, canvas: Canvas) -> Option<Vec<Point>> {
    let bbox = frame.bounding_box()?;
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return None;
    }

    let pad = bbox.width() * 0.1;
    let padded = Rect::new(bbox.x0 - pad, bbox.y0 - pad, bbox.x1 + pad, bbox.y1 + pad);

    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let scale = (cw / padded.width()).min(ch / padded.height()) * 0.8;
    let ox = (cw - padded.width() * scale) / 2.0 - padded.x0 * scale;
    let oy = (ch - padded.height() * scale) / 2.0 - padded.y0 * scale;

    Some(
        frame
            .points
            .iter()
            .map(|p| Point::new(p.x * scale + ox, p.y * scale + oy))
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/skeleton.rs"]
mod tests;

use crate::{
    foundation::core::{BezPath, Point, Rgba8, Vec2},
    render::ops::DrawOp,
    render::skeleton::{SkeletonPalette, StylizedOptions},
};

/// Landmarks per hand in the 21-point MediaPipe hand model.
pub(crate) const HAND_POINT_COUNT: usize = 21;

/// Straight-line hand topology: five finger chains plus palm-base links.
pub(crate) const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// Per-finger joint chains, base to tip.
const FINGER_CHAINS: [[usize; 4]; 5] = [
    [1, 2, 3, 4],
    [5, 6, 7, 8],
    [9, 10, 11, 12],
    [13, 14, 15, 16],
    [17, 18, 19, 20],
];

/// Finger-base landmarks; with the wrist they outline the palm.
const FINGER_BASES: [usize; 5] = [1, 5, 9, 13, 17];

/// Wire style: topology lines with uniform joint circles.
pub(crate) fn draw_wire(
    hand: &[Point],
    bone_width: f64,
    joint_radius: f64,
    palette: &SkeletonPalette,
    ops: &mut Vec<DrawOp>,
) {
    for &(a, b) in &HAND_CONNECTIONS {
        if a < hand.len() && b < hand.len() {
            ops.push(DrawOp::Line {
                from: hand[a],
                to: hand[b],
                width: bone_width,
                color: palette.bone,
            });
        }
    }
    for p in hand {
        ops.push(DrawOp::Circle {
            center: *p,
            radius: joint_radius,
            color: palette.joint,
        });
    }
}

/// Stylized style: filled smoothed palm, tapering finger strokes with round
/// joints, and the optional cosmetic passes. A hand segment shorter than the
/// 21-point model falls back to wire drawing.
pub(crate) fn draw_stylized(
    hand: &[Point],
    canvas_width: f64,
    palette: &SkeletonPalette,
    opts: &StylizedOptions,
    ops: &mut Vec<DrawOp>,
) {
    if hand.len() < HAND_POINT_COUNT {
        let unit = canvas_width.max(1.0);
        draw_wire(hand, (unit * 0.006).max(1.5), (unit * 0.01).max(2.0), palette, ops);
        return;
    }

    let wrist = hand[0];
    let span: f64 = FINGER_BASES
        .iter()
        .map(|&b| (hand[b] - wrist).hypot())
        .sum::<f64>()
        / FINGER_BASES.len() as f64;
    let base_width = (span * 0.22).clamp(canvas_width * 0.02, canvas_width * 0.08);

    if opts.shadow {
        let offset = Vec2::new(base_width * 0.35, base_width * 0.45);
        silhouette(hand, offset, base_width, palette.shadow, ops);
    }

    silhouette(hand, Vec2::ZERO, base_width, palette.palm, ops);

    if opts.two_tone {
        let palm_pts = palm_outline(hand);
        let inner = scale_toward_centroid(&palm_pts, 0.72);
        ops.push(DrawOp::FillPath {
            path: smooth_closed_path(&inner),
            color: palette.palm_highlight,
        });
        for chain in &FINGER_CHAINS {
            for seg in 0..3 {
                let w = taper(base_width, seg) * 0.55;
                ops.push(DrawOp::Line {
                    from: hand[chain[seg]],
                    to: hand[chain[seg + 1]],
                    width: w,
                    color: palette.palm_highlight,
                });
            }
        }
    }

    if opts.nails {
        for chain in &FINGER_CHAINS {
            let tip = hand[chain[3]];
            let along = tip - hand[chain[2]];
            let len = along.hypot();
            if len <= f64::EPSILON {
                continue;
            }
            let dir = along / len;
            let rotation = dir.y.atan2(dir.x);
            ops.push(DrawOp::Oval {
                center: tip,
                rx: base_width * 0.30,
                ry: base_width * 0.22,
                rotation_rad: rotation,
                color: palette.nail,
            });
            ops.push(DrawOp::Oval {
                center: tip - dir * (base_width * 0.08),
                rx: base_width * 0.12,
                ry: base_width * 0.08,
                rotation_rad: rotation,
                color: palette.nail_highlight,
            });
        }
    }

    if opts.joint_dots {
        for chain in &FINGER_CHAINS {
            for &joint in &chain[1..3] {
                ops.push(DrawOp::Circle {
                    center: hand[joint],
                    radius: base_width * 0.09,
                    color: palette.joint_dot,
                });
            }
        }
    }
}

/// Palm fill plus tapered finger strokes in one color, shifted by `offset`.
/// Shared by the shadow pass and the main silhouette.
fn silhouette(hand: &[Point], offset: Vec2, base_width: f64, color: Rgba8, ops: &mut Vec<DrawOp>) {
    let palm: Vec<Point> = palm_outline(hand).iter().map(|p| *p + offset).collect();
    ops.push(DrawOp::FillPath {
        path: smooth_closed_path(&palm),
        color,
    });

    for chain in &FINGER_CHAINS {
        for seg in 0..3 {
            let w = taper(base_width, seg);
            let from = hand[chain[seg]] + offset;
            let to = hand[chain[seg + 1]] + offset;
            ops.push(DrawOp::Line {
                from,
                to,
                width: w,
                color,
            });
            ops.push(DrawOp::Circle {
                center: from,
                radius: w / 2.0,
                color,
            });
            ops.push(DrawOp::Circle {
                center: to,
                radius: w / 2.0,
                color,
            });
        }
    }
}

/// Wrist plus the five finger-base points, in outline order.
fn palm_outline(hand: &[Point]) -> Vec<Point> {
    let mut pts = Vec::with_capacity(1 + FINGER_BASES.len());
    pts.push(hand[0]);
    pts.extend(FINGER_BASES.iter().map(|&b| hand[b]));
    pts
}

/// Stroke width for finger segment `seg` (0 at the base), narrowing
/// toward the tip.
fn taper(base_width: f64, seg: usize) -> f64 {
    base_width * (1.0 - 0.2 * seg as f64)
}

/// Closed quadratic path through the midpoints of successive vertices.
fn smooth_closed_path(pts: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let n = pts.len();
    if n < 3 {
        return path;
    }
    let mid = |a: Point, b: Point| Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    path.move_to(mid(pts[n - 1], pts[0]));
    for i in 0..n {
        path.quad_to(pts[i], mid(pts[i], pts[(i + 1) % n]));
    }
    path.close_path();
    path
}

fn scale_toward_centroid(pts: &[Point], factor: f64) -> Vec<Point> {
    let n = pts.len() as f64;
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / n;
    let c = Point::new(cx, cy);
    pts.iter().map(|p| c + (*p - c) * factor).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/hand.rs"]
mod tests;

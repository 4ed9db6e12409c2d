use super::*;

fn spread_hand() -> Vec<Point> {
    let mut pts = vec![Point::new(100.0, 400.0)];
    for finger in 0..5 {
        let x = 60.0 + 40.0 * finger as f64;
        for joint in 0..4 {
            pts.push(Point::new(x, 320.0 - 60.0 * joint as f64));
        }
    }
    pts
}

#[test]
fn taper_narrows_toward_the_tip() {
    let w = 20.0;
    assert_eq!(taper(w, 0), 20.0);
    assert!(taper(w, 1) < taper(w, 0));
    assert!(taper(w, 2) < taper(w, 1));
    assert!(taper(w, 2) > 0.0);
}

#[test]
fn smooth_closed_path_needs_three_points() {
    assert!(smooth_closed_path(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
        .elements()
        .is_empty());
    let tri = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(5.0, 8.0),
    ];
    assert!(!smooth_closed_path(&tri).elements().is_empty());
}

#[test]
fn scale_toward_centroid_shrinks_spread() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    let inner = scale_toward_centroid(&pts, 0.5);
    assert_eq!(inner[0], Point::new(2.5, 2.5));
    assert_eq!(inner[2], Point::new(7.5, 7.5));
}

#[test]
fn wire_guards_out_of_range_indices() {
    let mut ops = Vec::new();
    let palette = SkeletonPalette::default();
    draw_wire(&spread_hand()[..5], 2.0, 4.0, &palette, &mut ops);
    let lines = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Line { .. }))
        .count();
    // Only the thumb chain fits inside a 5-point segment.
    assert_eq!(lines, 4);
    let circles = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Circle { .. }))
        .count();
    assert_eq!(circles, 5);
}

#[test]
fn stylized_finger_width_is_clamped_to_canvas_share() {
    let mut ops = Vec::new();
    let palette = SkeletonPalette::default();
    let opts = StylizedOptions::default();
    let canvas_width = 640.0;
    draw_stylized(&spread_hand(), canvas_width, &palette, &opts, &mut ops);

    let widths: Vec<f64> = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Line { width, color, .. } if *color == palette.palm => Some(*width),
            _ => None,
        })
        .collect();
    assert!(!widths.is_empty());
    let max = widths.iter().cloned().fold(0.0, f64::max);
    assert!(max <= canvas_width * 0.08 + 1e-9);
    assert!(max >= canvas_width * 0.02 * 0.6); // base clamp, minus full taper
}

#[test]
fn stylized_short_segment_falls_back_to_wire() {
    let mut ops = Vec::new();
    let palette = SkeletonPalette::default();
    draw_stylized(
        &spread_hand()[..8],
        640.0,
        &palette,
        &StylizedOptions::default(),
        &mut ops,
    );
    assert!(!ops.iter().any(|op| matches!(op, DrawOp::FillPath { .. })));
    assert!(ops.iter().any(|op| matches!(op, DrawOp::Line { .. })));
}

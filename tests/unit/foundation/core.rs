use super::*;

#[test]
fn frame_rate_rejects_zero() {
    assert!(FrameRate::new(0).is_err());
    assert!(FrameRate::new(1).is_ok());
}

#[test]
fn frame_rate_period_is_one_over_rate() {
    let r = FrameRate::new(12).unwrap();
    let ms = r.frame_period().as_secs_f64() * 1000.0;
    assert!((ms - 83.333).abs() < 0.01);

    let r = FrameRate::new(1).unwrap();
    assert_eq!(r.frame_period(), Duration::from_secs(1));
}

#[test]
fn layout_validation() {
    assert!(LandmarkLayout::new(0, 0, 1).is_err());
    assert!(LandmarkLayout::new(0, 0, 0).is_err());
    assert!(LandmarkLayout::new(33, 0, 0).is_ok());
    assert!(LandmarkLayout::new(0, 21, 1).is_ok());
}

#[test]
fn layout_partitions_points() {
    let l = LandmarkLayout::holistic_upper_body();
    assert_eq!(l.points_per_frame(), 33 + 21 * 2);
    assert_eq!(l.hand_range(0), 33..54);
    assert_eq!(l.hand_range(1), 54..75);

    let h = LandmarkLayout::hand_only();
    assert_eq!(h.points_per_frame(), 21);
    assert_eq!(h.hand_range(0), 0..21);
}

#[test]
fn frame_bounding_box() {
    assert_eq!(Frame::default().bounding_box(), None);

    let f = Frame::new(vec![
        Landmark::new(1.0, 5.0, 0.0),
        Landmark::new(-2.0, 3.0, 0.0),
        Landmark::new(4.0, -1.0, 0.0),
    ]);
    let b = f.bounding_box().unwrap();
    assert_eq!((b.x0, b.y0, b.x1, b.y1), (-2.0, -1.0, 4.0, 5.0));
}

#[test]
fn identical_points_yield_zero_area_box() {
    let f = Frame::new(vec![Landmark::new(2.0, 2.0, 0.0); 4]);
    let b = f.bounding_box().unwrap();
    assert_eq!(b.width(), 0.0);
    assert_eq!(b.height(), 0.0);
}

#[test]
fn landmark_defaults_confidence_when_deserialized() {
    let l: Landmark = serde_json::from_str(r#"{"x": 0.5, "y": 0.25}"#).unwrap();
    assert_eq!(l.z, 0.0);
    assert_eq!(l.visibility, 1.0);
    assert_eq!(l.presence, 1.0);
}

#[test]
fn generation_bump_is_monotonic() {
    let g = Generation::default();
    assert_ne!(g, g.bump());
    assert_eq!(g.bump().bump(), Generation(2));
}

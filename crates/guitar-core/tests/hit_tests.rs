// Hit resolution: closed-segment distance, containment filters and tie-breaking.

mod common;

use common::approx_eq;
use glam::Vec2;
use guitar_core::*;

fn phone_segments() -> Vec<Segment> {
    let vp = Viewport::new(390.0, 844.0, Insets::default());
    generate_segments(&vp, &SoundBank::default(), &GridParams::default()).unwrap()
}

fn vertical(index: usize, x: f32, y0: f32, y1: f32) -> Segment {
    Segment {
        index,
        start: Vec2::new(x, y0),
        end: Vec2::new(x, y1),
        orientation: Orientation::Vertical,
    }
}

fn horizontal(index: usize, y: f32, x0: f32, x1: f32) -> Segment {
    Segment {
        index,
        start: Vec2::new(x0, y),
        end: Vec2::new(x1, y),
        orientation: Orientation::Horizontal,
    }
}

#[test]
fn distance_is_clamped_to_the_endpoints() {
    let a = Vec2::new(0.0, 0.0);
    let b = Vec2::new(0.0, 10.0);
    assert!(approx_eq(distance_to_segment(Vec2::new(3.0, 5.0), a, b), 3.0, 1e-6));
    // beyond `b`: distance to the endpoint, not to the infinite line
    assert!(approx_eq(distance_to_segment(Vec2::new(0.0, 13.0), a, b), 3.0, 1e-6));
    assert!(approx_eq(distance_to_segment(Vec2::new(3.0, 14.0), a, b), 5.0, 1e-6));
    assert!(approx_eq(distance_to_segment(Vec2::new(-4.0, -3.0), a, b), 5.0, 1e-6));
}

#[test]
fn zero_length_segment_measures_to_the_point() {
    let p = Vec2::new(2.0, 2.0);
    let d = distance_to_segment(Vec2::new(5.0, 6.0), p, p);
    assert!(approx_eq(d, 5.0, 1e-6));
}

#[test]
fn distance_is_symmetric_in_the_endpoints() {
    let pairs = [
        (Vec2::new(0.0, 0.0), Vec2::new(10.0, 3.0)),
        (Vec2::new(-7.5, 2.0), Vec2::new(4.0, -9.0)),
        (Vec2::new(130.0, -30.0), Vec2::new(130.0, 311.3)),
    ];
    let points = [
        Vec2::new(1.0, 1.0),
        Vec2::new(-20.0, 40.0),
        Vec2::new(130.0, 50.0),
        Vec2::new(500.0, -500.0),
    ];
    for (a, b) in pairs {
        for p in points {
            let ab = distance_to_segment(p, a, b);
            let ba = distance_to_segment(p, b, a);
            assert!(approx_eq(ab, ba, 1e-3), "{p:?} vs {a:?}-{b:?}: {ab} != {ba}");
        }
    }
}

#[test]
fn midpoint_of_every_segment_hits_that_segment() {
    let segs = phone_segments();
    let resolver = HitResolver::default();
    for s in &segs {
        let hit = resolver
            .resolve(s.midpoint(), &segs, 390.0)
            .unwrap_or_else(|| panic!("midpoint of {} missed", s.index));
        assert_eq!(hit.index, s.index);
        assert!(hit.distance < 1e-3);
    }
}

#[test]
fn far_touches_resolve_to_nothing() {
    let segs = phone_segments();
    let resolver = HitResolver::default();
    assert_eq!(resolver.resolve(Vec2::new(0.0, 0.0), &segs, 390.0), None);
    // centre of the top-middle cell is 65 px from every line
    assert_eq!(resolver.resolve(Vec2::new(195.0, 140.0), &segs, 390.0), None);
    assert_eq!(resolver.resolve(Vec2::new(130.0, 50.0), &[], 390.0), None);
}

#[test]
fn touch_near_top_of_left_column_hits_string_zero() {
    let segs = phone_segments();
    let hit = HitResolver::default()
        .resolve(Vec2::new(130.0, 50.0), &segs, 390.0)
        .unwrap();
    assert_eq!(hit.index, 0);
    assert!(approx_eq(hit.distance, 0.0, 1e-3));
}

#[test]
fn equidistant_segments_resolve_to_the_lower_index() {
    let segs = [vertical(0, 0.0, 0.0, 100.0), vertical(1, 10.0, 0.0, 100.0)];
    let hit = HitResolver::default()
        .resolve_with_threshold(Vec2::new(5.0, 50.0), &segs, 30.0)
        .unwrap();
    assert_eq!(hit.index, 0);
    assert!(approx_eq(hit.distance, 5.0, 1e-6));
}

#[test]
fn overlapping_tolerance_band_prefers_the_first_band() {
    // 300 is inside both string 0's extension and string 1's span
    let segs = phone_segments();
    let hit = HitResolver::default()
        .resolve(Vec2::new(130.0, 300.0), &segs, 390.0)
        .unwrap();
    assert_eq!(hit.index, 0);
}

#[test]
fn right_column_has_no_tolerance_past_its_first_band() {
    let segs = phone_segments();
    let band = 844.0 / 3.0;
    let resolver = HitResolver::default();
    assert_eq!(resolver.resolve(Vec2::new(260.0, -10.0), &segs, 390.0), None);
    assert_eq!(
        resolver
            .resolve(Vec2::new(260.0, band + 10.0), &segs, 390.0)
            .map(|h| h.index),
        Some(4)
    );
    // the left column keeps its overlap
    assert_eq!(
        resolver
            .resolve(Vec2::new(130.0, band + 10.0), &segs, 390.0)
            .map(|h| h.index),
        Some(0)
    );
}

#[test]
fn nearest_admissible_segment_wins() {
    let segs = [vertical(0, 0.0, 0.0, 100.0), vertical(1, 10.0, 0.0, 100.0)];
    let hit = HitResolver::default()
        .resolve_with_threshold(Vec2::new(8.0, 50.0), &segs, 30.0)
        .unwrap();
    assert_eq!(hit.index, 1);
}

#[test]
fn threshold_scales_with_viewport_width() {
    assert!(approx_eq(touch_threshold_for_width(390.0), 30.0, 1e-6));
    assert!(approx_eq(touch_threshold_for_width(780.0), 60.0, 1e-6));

    let segs = [vertical(0, 100.0, 0.0, 500.0)];
    let touch = Vec2::new(140.0, 250.0);
    let resolver = HitResolver::default();
    assert_eq!(resolver.resolve(touch, &segs, 390.0), None);
    assert_eq!(resolver.resolve(touch, &segs, 780.0).map(|h| h.index), Some(0));
}

#[test]
fn vertical_strings_need_the_touch_inside_their_span() {
    let segs = [vertical(0, 100.0, 0.0, 100.0)];
    let resolver = HitResolver::default();
    // 10 px above the start: close enough, but outside the y-range
    assert_eq!(resolver.resolve_with_threshold(Vec2::new(100.0, -10.0), &segs, 30.0), None);
    assert!(resolver
        .resolve_with_threshold(Vec2::new(100.0, 0.0), &segs, 30.0)
        .is_some());
}

#[test]
fn legacy_policy_checks_horizontal_deviation_only() {
    let segs = [horizontal(6, 50.0, 0.0, 100.0)];
    let legacy = HitResolver::new(HitParams {
        policy: ContainmentPolicy::Legacy,
    });
    let unified = HitResolver::new(HitParams {
        policy: ContainmentPolicy::Unified,
    });

    let past_the_end = Vec2::new(110.0, 50.0);
    assert_eq!(
        legacy
            .resolve_with_threshold(past_the_end, &segs, 30.0)
            .map(|h| h.index),
        Some(6)
    );
    assert_eq!(unified.resolve_with_threshold(past_the_end, &segs, 30.0), None);

    let below = Vec2::new(50.0, 70.0);
    assert!(legacy.resolve_with_threshold(below, &segs, 30.0).is_some());
    assert!(unified.resolve_with_threshold(below, &segs, 30.0).is_some());
}

#[test]
fn policies_agree_for_touches_inside_the_view() {
    let segs = phone_segments();
    let legacy = HitResolver::new(HitParams {
        policy: ContainmentPolicy::Legacy,
    });
    let unified = HitResolver::new(HitParams {
        policy: ContainmentPolicy::Unified,
    });
    for x in (0..=390).step_by(5) {
        for y in (0..=844).step_by(7) {
            let p = Vec2::new(x as f32, y as f32);
            assert_eq!(
                legacy.resolve(p, &segs, 390.0).map(|h| h.index),
                unified.resolve(p, &segs, 390.0).map(|h| h.index),
                "touch at {p}"
            );
        }
    }
}

#[test]
fn default_policy_is_legacy() {
    assert_eq!(HitResolver::default().policy(), ContainmentPolicy::Legacy);
}

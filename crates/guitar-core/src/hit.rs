//! Touch hit testing: filter segments by distance and containment, then pick the nearest.

use glam::Vec2;

use crate::constants::touch_threshold_for_width;
use crate::layout::{Orientation, Segment};

/// How a touch must relate to a segment's extent before its distance counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainmentPolicy {
    /// Vertical strings require the touch's y inside the segment's y-range;
    /// horizontal strings only require the touch's perpendicular deviation
    /// from the line to be under the threshold, with no x-range check. Past
    /// the outer ends of a row this admits touches `Unified` rejects; inside
    /// the view both policies resolve the same string.
    #[default]
    Legacy,
    /// Both orientations require the touch to fall inside the segment's
    /// range along its own axis.
    Unified,
}

#[derive(Clone, Debug, Default)]
pub struct HitParams {
    pub policy: ContainmentPolicy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub distance: f32,
}

/// Closed-segment distance: the projection onto `a..b` is clamped to the endpoints.
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    // zero-length segments degrade to point distance
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

#[inline]
fn within(v: f32, a: f32, b: f32) -> bool {
    v >= a.min(b) && v <= a.max(b)
}

fn contains(policy: ContainmentPolicy, seg: &Segment, p: Vec2, threshold: f32) -> bool {
    match (seg.orientation, policy) {
        (Orientation::Vertical, _) => within(p.y, seg.start.y, seg.end.y),
        (Orientation::Horizontal, ContainmentPolicy::Legacy) => (p.y - seg.start.y).abs() < threshold,
        (Orientation::Horizontal, ContainmentPolicy::Unified) => within(p.x, seg.start.x, seg.end.x),
    }
}

/// Stateless resolver from touch points to string indices.
#[derive(Clone, Debug, Default)]
pub struct HitResolver {
    params: HitParams,
}

impl HitResolver {
    pub fn new(params: HitParams) -> Self {
        Self { params }
    }

    pub fn policy(&self) -> ContainmentPolicy {
        self.params.policy
    }

    /// Resolve `point` against `segments` with the threshold for `viewport_width`.
    pub fn resolve(&self, point: Vec2, segments: &[Segment], viewport_width: f32) -> Option<Hit> {
        self.resolve_with_threshold(point, segments, touch_threshold_for_width(viewport_width))
    }

    /// Nearest admissible segment; ties keep the first one visited (lowest index).
    pub fn resolve_with_threshold(
        &self,
        point: Vec2,
        segments: &[Segment],
        threshold: f32,
    ) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for seg in segments {
            let distance = distance_to_segment(point, seg.start, seg.end);
            if !(distance < threshold) || !contains(self.params.policy, seg, point, threshold) {
                continue;
            }
            match best {
                Some(b) if distance >= b.distance => {}
                _ => {
                    best = Some(Hit {
                        index: seg.index,
                        distance,
                    })
                }
            }
        }
        best
    }
}

use super::{Point2, TOLERANCE};

/// How two bounded 2D segments relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRelation {
    /// No common point.
    Disjoint,
    /// Interiors cross at a single point.
    Crossing,
    /// A single common point involving at least one endpoint.
    Touching,
    /// Collinear segments sharing more than a single point.
    Overlapping,
}

/// 2D cross product of `(b - a)` and `(c - a)`.
#[inline]
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` if `p` lies on the segment `a -> b` within tolerance.
#[must_use]
pub fn point_on_segment_2d(p: &Point2, a: &Point2, b: &Point2) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < TOLERANCE * TOLERANCE {
        return (p.x - a.x).abs() < TOLERANCE && (p.y - a.y).abs() < TOLERANCE;
    }
    let cross = dx * (p.y - a.y) - dy * (p.x - a.x);
    if cross.abs() > TOLERANCE * len_sq.sqrt() {
        return false;
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    (-TOLERANCE..=1.0 + TOLERANCE).contains(&t)
}

/// Classifies the intersection of segments `a0 -> a1` and `b0 -> b1`.
///
/// Endpoint-to-endpoint contact and endpoint-on-interior contact both count
/// as [`Touching`](SegmentRelation::Touching); a proper interior crossing is
/// [`Crossing`](SegmentRelation::Crossing).
#[must_use]
pub fn segment_segment_relation_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> SegmentRelation {
    let d1 = orient_2d(b0, b1, a0);
    let d2 = orient_2d(b0, b1, a1);
    let d3 = orient_2d(a0, a1, b0);
    let d4 = orient_2d(a0, a1, b1);

    let eps = seg_eps(a0, a1, b0, b1);

    let z1 = d1.abs() <= eps;
    let z2 = d2.abs() <= eps;
    let z3 = d3.abs() <= eps;
    let z4 = d4.abs() <= eps;

    if z1 && z2 && z3 && z4 {
        // Collinear: compare 1D extents along the dominant axis.
        return collinear_relation(a0, a1, b0, b1);
    }

    let straddle_a = (d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps);
    let straddle_b = (d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps);

    if straddle_a && straddle_b {
        return SegmentRelation::Crossing;
    }

    // An endpoint lying on the other segment is a touch.
    if (z1 && point_on_segment_2d(a0, b0, b1))
        || (z2 && point_on_segment_2d(a1, b0, b1))
        || (z3 && point_on_segment_2d(b0, a0, a1))
        || (z4 && point_on_segment_2d(b1, a0, a1))
    {
        return SegmentRelation::Touching;
    }

    SegmentRelation::Disjoint
}

/// Orientation epsilon scaled by segment extent, so that long segments do not
/// spuriously report grazing contact.
fn seg_eps(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> f64 {
    let ext = (a1 - a0).norm().max((b1 - b0).norm()).max(1.0);
    TOLERANCE * ext
}

fn collinear_relation(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentRelation {
    // Project onto the dominant axis of segment A.
    let dx = (a1.x - a0.x).abs();
    let dy = (a1.y - a0.y).abs();
    let proj = |p: &Point2| if dx >= dy { p.x } else { p.y };

    let (mut lo_a, mut hi_a) = (proj(a0), proj(a1));
    if lo_a > hi_a {
        std::mem::swap(&mut lo_a, &mut hi_a);
    }
    let (mut lo_b, mut hi_b) = (proj(b0), proj(b1));
    if lo_b > hi_b {
        std::mem::swap(&mut lo_b, &mut hi_b);
    }

    let lo = lo_a.max(lo_b);
    let hi = hi_a.min(hi_b);
    if hi < lo - TOLERANCE {
        SegmentRelation::Disjoint
    } else if hi - lo <= TOLERANCE {
        SegmentRelation::Touching
    } else {
        SegmentRelation::Overlapping
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    // ── segment_segment_relation_2d ──

    #[test]
    fn proper_crossing() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(2.0, 2.0),
            &p(0.0, 2.0),
            &p(2.0, 0.0),
        );
        assert_eq!(r, SegmentRelation::Crossing);
    }

    #[test]
    fn disjoint_segments() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(0.0, 1.0),
            &p(1.0, 1.0),
        );
        assert_eq!(r, SegmentRelation::Disjoint);
    }

    #[test]
    fn shared_endpoint_touches() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 0.0),
            &p(2.0, 1.0),
        );
        assert_eq!(r, SegmentRelation::Touching);
    }

    #[test]
    fn endpoint_on_interior_touches() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 1.0),
        );
        assert_eq!(r, SegmentRelation::Touching);
    }

    #[test]
    fn collinear_overlap() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(1.0, 0.0),
            &p(3.0, 0.0),
        );
        assert_eq!(r, SegmentRelation::Overlapping);
    }

    #[test]
    fn collinear_disjoint() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(2.0, 0.0),
            &p(3.0, 0.0),
        );
        assert_eq!(r, SegmentRelation::Disjoint);
    }

    #[test]
    fn collinear_endpoint_contact() {
        let r = segment_segment_relation_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 0.0),
            &p(2.0, 0.0),
        );
        assert_eq!(r, SegmentRelation::Touching);
    }

    // ── point_on_segment_2d ──

    #[test]
    fn point_on_segment_interior() {
        assert!(point_on_segment_2d(&p(0.5, 0.0), &p(0.0, 0.0), &p(1.0, 0.0)));
    }

    #[test]
    fn point_off_segment() {
        assert!(!point_on_segment_2d(&p(0.5, 0.1), &p(0.0, 0.0), &p(1.0, 0.0)));
        assert!(!point_on_segment_2d(&p(1.5, 0.0), &p(0.0, 0.0), &p(1.0, 0.0)));
    }
}

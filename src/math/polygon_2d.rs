use super::intersect_2d::{point_on_segment_2d, segment_segment_relation_2d, SegmentRelation};
use super::Point2;

/// Location of a point relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    OnBoundary,
    Outside,
}

/// Computes the signed area of a closed ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Locates a point relative to a closed ring using the winding number,
/// with an explicit boundary test first.
#[must_use]
pub fn locate_point_in_ring(p: &Point2, ring: &[Point2]) -> PointLocation {
    let n = ring.len();
    if n < 3 {
        return PointLocation::Outside;
    }
    for i in 0..n {
        if point_on_segment_2d(p, &ring[i], &ring[(i + 1) % n]) {
            return PointLocation::OnBoundary;
        }
    }
    if winding_number_2d(p, ring) == 0 {
        PointLocation::Outside
    } else {
        PointLocation::Inside
    }
}

/// Winding number of point `p` with respect to ring `verts`.
///
/// Non-zero => inside, zero => outside.
#[must_use]
pub fn winding_number_2d(p: &Point2, verts: &[Point2]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = &verts[i];
        let b = &verts[(i + 1) % n];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if a.y <= p.y {
            if b.y > p.y && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// The strongest contact found between the boundaries of two rings.
///
/// `Crossing` dominates `Overlapping`, which dominates `Touching`. Edge pairs
/// sharing a ring vertex are still compared; a shared vertex between two
/// different rings is genuine contact, unlike adjacency within one ring.
#[must_use]
pub fn ring_boundaries_relation(a: &[Point2], b: &[Point2]) -> SegmentRelation {
    let mut strongest = SegmentRelation::Disjoint;
    let na = a.len();
    let nb = b.len();
    for i in 0..na {
        let a0 = &a[i];
        let a1 = &a[(i + 1) % na];
        for j in 0..nb {
            let b0 = &b[j];
            let b1 = &b[(j + 1) % nb];
            let r = segment_segment_relation_2d(a0, a1, b0, b1);
            strongest = stronger(strongest, r);
            if strongest == SegmentRelation::Crossing {
                return strongest;
            }
        }
    }
    strongest
}

fn stronger(a: SegmentRelation, b: SegmentRelation) -> SegmentRelation {
    let rank = |r: SegmentRelation| match r {
        SegmentRelation::Disjoint => 0,
        SegmentRelation::Touching => 1,
        SegmentRelation::Overlapping => 2,
        SegmentRelation::Crossing => 3,
    };
    if rank(b) > rank(a) {
        b
    } else {
        a
    }
}

/// Returns `true` if a ring's boundary self-intersects.
///
/// Adjacent edges are exempt from the pairwise test except when they fold
/// back onto each other (a spike), which counts as a self-intersection of
/// the boundary.
#[must_use]
pub fn ring_self_intersects(ring: &[Point2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a0 = &ring[i];
        let a1 = &ring[(i + 1) % n];
        for j in (i + 1)..n {
            let b0 = &ring[j];
            let b1 = &ring[(j + 1) % n];
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            let r = segment_segment_relation_2d(a0, a1, b0, b1);
            if adjacent {
                // Consecutive edges legitimately share one endpoint; anything
                // more is a fold-back.
                if r == SegmentRelation::Overlapping || r == SegmentRelation::Crossing {
                    return true;
                }
            } else if r != SegmentRelation::Disjoint {
                return true;
            }
        }
    }
    false
}

/// Returns `true` if two rings describe the same closed boundary, in either
/// direction, up to a cyclic shift.
#[must_use]
pub fn rings_identical(a: &[Point2], b: &[Point2], tol: f64) -> bool {
    let n = a.len();
    if n != b.len() || n == 0 {
        return false;
    }
    let same = |p: &Point2, q: &Point2| (p - q).norm_squared() <= tol * tol;
    for shift in 0..n {
        if (0..n).all(|i| same(&a[i], &b[(i + shift) % n])) {
            return true;
        }
        if (0..n).all(|i| same(&a[i], &b[(n + shift - i) % n])) {
            return true;
        }
    }
    false
}

/// Returns `true` if every vertex of `inner` lies strictly inside `outer`.
#[must_use]
pub fn ring_strictly_inside(inner: &[Point2], outer: &[Point2]) -> bool {
    inner
        .iter()
        .all(|p| locate_point_in_ring(p, outer) == PointLocation::Inside)
}

/// Centroid of a ring's vertices. Degenerate input yields the first vertex.
#[must_use]
pub fn ring_centroid(ring: &[Point2]) -> Point2 {
    if ring.is_empty() {
        return Point2::new(0.0, 0.0);
    }
    let mut x = 0.0;
    let mut y = 0.0;
    for p in ring {
        x += p.x;
        y += p.y;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = ring.len() as f64;
    Point2::new(x / n, y / n)
}

/// An interior point of the ring, robust for non-convex shapes.
///
/// Walks midpoints of diagonals from vertex 0 until one lands strictly
/// inside; falls back to the vertex centroid.
#[must_use]
pub fn interior_point(ring: &[Point2]) -> Point2 {
    let n = ring.len();
    for i in 1..n.saturating_sub(1) {
        let mid = Point2::new(
            (ring[0].x + ring[i].x + ring[i + 1].x) / 3.0,
            (ring[0].y + ring[i].y + ring[i + 1].y) / 3.0,
        );
        if locate_point_in_ring(&mid, ring) == PointLocation::Inside {
            return mid;
        }
    }
    ring_centroid(ring)
}

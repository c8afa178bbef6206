use crate::geometry::Plane;

use super::polygon_2d::{
    locate_point_in_ring, ring_boundaries_relation, winding_number_2d, PointLocation,
};
use super::polygon_3d::{face_contains_point, interior_point_3d, project_ring};
use super::{Point3, Vector3, TOLERANCE};

/// Relationship between two planes.
#[derive(Debug)]
pub enum PlanePairRelation {
    /// Planes intersect along a line.
    IntersectionLine { origin: Point3, direction: Vector3 },
    /// Planes are parallel but not coincident.
    Parallel { distance: f64 },
    /// Planes are the same (coincident).
    Coincident,
}

/// Computes the intersection of two planes.
///
/// Returns an [`IntersectionLine`](PlanePairRelation::IntersectionLine) with a
/// unit-length `direction` when the planes cross, [`Parallel`](PlanePairRelation::Parallel)
/// when they don't, or [`Coincident`](PlanePairRelation::Coincident) when they overlap.
#[must_use]
pub fn plane_plane_intersect(a: &Plane, b: &Plane) -> PlanePairRelation {
    let na = a.plane_normal();
    let nb = b.plane_normal();

    let dir = na.cross(nb);
    let dir_len = dir.norm();

    if dir_len < TOLERANCE {
        // Normals are (anti-)parallel: planes are parallel or coincident.
        let diff = b.origin() - a.origin();
        let dist = diff.dot(na).abs();
        if dist < TOLERANCE {
            PlanePairRelation::Coincident
        } else {
            PlanePairRelation::Parallel { distance: dist }
        }
    } else {
        let dir = dir / dir_len;

        // Find a point on the intersection line.
        // Solve na.dot(p - oa) = 0 AND nb.dot(p - ob) = 0 simultaneously.
        // Write p = oa + s * na + t * nb  (the component along dir is free).
        let d2 = nb.dot(&(b.origin() - a.origin()));
        let dot_nn = na.dot(nb);
        let denom = 1.0 - dot_nn * dot_nn;

        let origin = if denom.abs() < TOLERANCE {
            *a.origin()
        } else {
            let s = (-dot_nn * d2) / denom;
            let t = d2 / denom;
            a.origin() + na * s + nb * t
        };

        PlanePairRelation::IntersectionLine {
            origin,
            direction: dir,
        }
    }
}

/// A planar face handed to the 3D intersection predicates: a fitted plane,
/// the outer ring, and any hole rings.
#[derive(Debug)]
pub struct PlanarFace<'a> {
    pub plane: &'a Plane,
    pub outer: &'a [Point3],
    pub holes: &'a [Vec<Point3>],
}

/// Clips a line segment to a planar face with holes.
///
/// The segment must be coplanar with the face. Returns sub-segments inside
/// the face as `(t_start, t_end)` pairs along the original segment `[0, 1]`.
#[must_use]
pub fn clip_segment_to_face(
    seg_start: &Point3,
    seg_end: &Point3,
    face: &PlanarFace<'_>,
) -> Vec<(f64, f64)> {
    if face.outer.len() < 3 {
        return Vec::new();
    }

    let s = face.plane.to_2d(seg_start);
    let e = face.plane.to_2d(seg_end);
    let du = e.x - s.x;
    let dv = e.y - s.y;

    let outer_2d = project_ring(face.plane, face.outer);
    let holes_2d: Vec<Vec<super::Point2>> = face
        .holes
        .iter()
        .map(|h| project_ring(face.plane, h))
        .collect();

    // Collect all t-values where the segment crosses any ring edge.
    let mut crossings: Vec<f64> = vec![0.0, 1.0];
    let mut collect = |ring: &[super::Point2]| {
        let n = ring.len();
        for i in 0..n {
            let a = &ring[i];
            let b = &ring[(i + 1) % n];
            let edx = b.x - a.x;
            let edy = b.y - a.y;

            let cross = du * edy - dv * edx;
            if cross.abs() < TOLERANCE {
                continue; // Parallel
            }

            let dx = a.x - s.x;
            let dy = a.y - s.y;
            let t = (dx * edy - dy * edx) / cross;
            let u_edge = (dx * dv - dy * du) / cross;

            let eps = TOLERANCE;
            if t >= -eps && t <= 1.0 + eps && u_edge >= -eps && u_edge <= 1.0 + eps {
                crossings.push(t.clamp(0.0, 1.0));
            }
        }
    };
    collect(&outer_2d);
    for h in &holes_2d {
        collect(h);
    }

    crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    crossings.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);

    // Midpoint containment decides each interval between crossings.
    let mut result: Vec<(f64, f64)> = Vec::new();
    for win in crossings.windows(2) {
        let (t0, t1) = (win[0], win[1]);
        if t1 - t0 < TOLERANCE {
            continue;
        }
        let mid = super::Point2::new(s.x + du * (t0 + t1) * 0.5, s.y + dv * (t0 + t1) * 0.5);
        let inside_outer = winding_number_2d(&mid, &outer_2d) != 0;
        let in_hole = holes_2d.iter().any(|h| winding_number_2d(&mid, h) != 0);
        if inside_outer && !in_hole {
            if let Some(last) = result.last_mut() {
                if (t0 - last.1).abs() < TOLERANCE {
                    last.1 = t1;
                    continue;
                }
            }
            result.push((t0, t1));
        }
    }

    result
}

/// Tests whether two planar faces share surface area or cross each other.
///
/// Faces in crossing planes intersect when the plane-pair line passes through
/// both; coplanar faces intersect when their boundaries meet or one contains
/// the other. Pure plane-to-plane touching below `contact_tol` of overlap is
/// ignored, which keeps edge-adjacent faces of a well-formed shell out.
#[must_use]
pub fn faces_intersect(a: &PlanarFace<'_>, b: &PlanarFace<'_>, contact_tol: f64) -> bool {
    match plane_plane_intersect(a.plane, b.plane) {
        PlanePairRelation::Parallel { .. } => false,
        PlanePairRelation::Coincident => coplanar_faces_overlap(a, b),
        PlanePairRelation::IntersectionLine { origin, direction } => {
            let all: Vec<&Point3> = a.outer.iter().chain(b.outer.iter()).collect();
            let (t_min, t_max) = line_extent(&origin, &direction, &all);
            let margin = 1.0;
            let seg_start = origin + direction * (t_min - margin);
            let seg_end = origin + direction * (t_max + margin);

            let intervals_a = clip_segment_to_face(&seg_start, &seg_end, a);
            let intervals_b = clip_segment_to_face(&seg_start, &seg_end, b);

            let span = (seg_end - seg_start).norm();
            for &(a0, a1) in &intervals_a {
                for &(b0, b1) in &intervals_b {
                    let overlap = (a1.min(b1) - a0.max(b0)) * span;
                    if overlap > contact_tol {
                        return true;
                    }
                }
            }
            false
        }
    }
}

/// Coplanar overlap test: boundary contact or full containment either way.
fn coplanar_faces_overlap(a: &PlanarFace<'_>, b: &PlanarFace<'_>) -> bool {
    let outer_a = project_ring(a.plane, a.outer);
    let outer_b: Vec<super::Point2> = b.outer.iter().map(|p| a.plane.to_2d(p)).collect();

    use crate::math::intersect_2d::SegmentRelation;
    if ring_boundaries_relation(&outer_a, &outer_b) != SegmentRelation::Disjoint {
        return true;
    }
    // Disjoint boundaries: one face may still sit inside the other.
    if let Some(ip) = interior_point_3d(a.plane, a.outer) {
        if face_contains_point(&ip, b.plane, b.outer, b.holes) {
            return true;
        }
    }
    if let Some(ip) = interior_point_3d(b.plane, b.outer) {
        if face_contains_point(&ip, a.plane, a.outer, a.holes) {
            return true;
        }
    }
    false
}

/// Computes the min/max projection of a set of points onto a line.
fn line_extent(origin: &Point3, dir: &Vector3, points: &[&Point3]) -> (f64, f64) {
    let mut t_min = f64::INFINITY;
    let mut t_max = f64::NEG_INFINITY;
    for p in points {
        let t = (*p - origin).dot(dir);
        if t < t_min {
            t_min = t;
        }
        if t > t_max {
            t_max = t;
        }
    }
    (t_min, t_max)
}

/// Parametric distance along the `+X` ray from `origin` to its crossing of
/// the face, or `None` when the ray misses, grazes the face plane, or starts
/// past it.
///
/// Used for point-in-shell parity counting.
#[must_use]
pub fn ray_x_crossing(origin: &Point3, face: &PlanarFace<'_>) -> Option<f64> {
    let normal = face.plane.plane_normal();
    if normal.x.abs() < TOLERANCE {
        // Ray runs parallel to the face plane.
        return None;
    }
    let t = face.plane.signed_distance(origin) / -normal.x;
    if t <= TOLERANCE {
        return None;
    }
    let hit = Point3::new(origin.x + t, origin.y, origin.z);
    let p = face.plane.to_2d(&hit);
    let outer_2d = project_ring(face.plane, face.outer);
    match locate_point_in_ring(&p, &outer_2d) {
        PointLocation::Outside => None,
        PointLocation::OnBoundary | PointLocation::Inside => {
            for hole in face.holes {
                let hole_2d = project_ring(face.plane, hole);
                if locate_point_in_ring(&p, &hole_2d) == PointLocation::Inside {
                    return None;
                }
            }
            Some(t)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    const NO_HOLES: &[Vec<Point3>] = &[];

    // ── plane_plane_intersect ──

    #[test]
    fn perpendicular_planes_intersect() {
        let xy = Plane::from_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let xz = Plane::from_normal(p(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0)).unwrap();

        match plane_plane_intersect(&xy, &xz) {
            PlanePairRelation::IntersectionLine { direction, .. } => {
                assert!(
                    direction.x.abs() > 0.99,
                    "expected X-axis direction, got {direction:?}"
                );
            }
            other => panic!("expected IntersectionLine, got {other:?}"),
        }
    }

    #[test]
    fn parallel_planes() {
        let a = Plane::from_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let b = Plane::from_normal(p(0.0, 0.0, 5.0), v(0.0, 0.0, 1.0)).unwrap();

        match plane_plane_intersect(&a, &b) {
            PlanePairRelation::Parallel { distance } => {
                assert!((distance - 5.0).abs() < TOLERANCE);
            }
            other => panic!("expected Parallel, got {other:?}"),
        }
    }

    #[test]
    fn coincident_planes() {
        let a = Plane::from_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let b = Plane::from_normal(p(1.0, 2.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();

        assert!(matches!(
            plane_plane_intersect(&a, &b),
            PlanePairRelation::Coincident
        ));
    }

    #[test]
    fn intersection_point_lies_on_both_planes() {
        let a = Plane::from_normal(p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let b = Plane::from_normal(p(0.0, 2.0, 0.0), v(0.0, 1.0, 0.0)).unwrap();

        match plane_plane_intersect(&a, &b) {
            PlanePairRelation::IntersectionLine { origin, direction } => {
                let dist_a = (origin - p(1.0, 0.0, 0.0)).dot(&v(1.0, 0.0, 0.0));
                let dist_b = (origin - p(0.0, 2.0, 0.0)).dot(&v(0.0, 1.0, 0.0));
                assert!(dist_a.abs() < TOLERANCE);
                assert!(dist_b.abs() < TOLERANCE);
                assert!(direction.z.abs() > 0.99);
            }
            other => panic!("expected IntersectionLine, got {other:?}"),
        }
    }

    // ── faces_intersect ──

    fn quad_xy() -> Vec<Point3> {
        vec![
            p(-1.0, -1.0, 0.0),
            p(1.0, -1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(-1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn perpendicular_quads_crossing() {
        let a_pts = quad_xy();
        let b_pts = vec![
            p(-1.0, 0.0, -1.0),
            p(1.0, 0.0, -1.0),
            p(1.0, 0.0, 1.0),
            p(-1.0, 0.0, 1.0),
        ];
        let plane_a = Plane::best_fit(&a_pts).unwrap();
        let plane_b = Plane::best_fit(&b_pts).unwrap();
        let a = PlanarFace {
            plane: &plane_a,
            outer: &a_pts,
            holes: NO_HOLES,
        };
        let b = PlanarFace {
            plane: &plane_b,
            outer: &b_pts,
            holes: NO_HOLES,
        };
        assert!(faces_intersect(&a, &b, 1e-8));
    }

    #[test]
    fn parallel_quads_disjoint() {
        let a_pts = quad_xy();
        let b_pts: Vec<Point3> = a_pts.iter().map(|q| p(q.x, q.y, 5.0)).collect();
        let plane_a = Plane::best_fit(&a_pts).unwrap();
        let plane_b = Plane::best_fit(&b_pts).unwrap();
        let a = PlanarFace {
            plane: &plane_a,
            outer: &a_pts,
            holes: NO_HOLES,
        };
        let b = PlanarFace {
            plane: &plane_b,
            outer: &b_pts,
            holes: NO_HOLES,
        };
        assert!(!faces_intersect(&a, &b, 1e-8));
    }

    #[test]
    fn edge_adjacent_quads_not_intersecting() {
        // Two faces of a cube sharing the edge x in [-1,1], y=1, z=0.
        let a_pts = quad_xy();
        let b_pts = vec![
            p(-1.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 1.0, 2.0),
            p(-1.0, 1.0, 2.0),
        ];
        let plane_a = Plane::best_fit(&a_pts).unwrap();
        let plane_b = Plane::best_fit(&b_pts).unwrap();
        let a = PlanarFace {
            plane: &plane_a,
            outer: &a_pts,
            holes: NO_HOLES,
        };
        let b = PlanarFace {
            plane: &plane_b,
            outer: &b_pts,
            holes: NO_HOLES,
        };
        assert!(!faces_intersect(&a, &b, 1e-8));
    }

    #[test]
    fn quad_pierced_through_interior() {
        let a_pts = quad_xy();
        // Vertical quad poking through the middle of face A.
        let b_pts = vec![
            p(-0.5, 0.0, -1.0),
            p(0.5, 0.0, -1.0),
            p(0.5, 0.0, 1.0),
            p(-0.5, 0.0, 1.0),
        ];
        let plane_a = Plane::best_fit(&a_pts).unwrap();
        let plane_b = Plane::best_fit(&b_pts).unwrap();
        let a = PlanarFace {
            plane: &plane_a,
            outer: &a_pts,
            holes: NO_HOLES,
        };
        let b = PlanarFace {
            plane: &plane_b,
            outer: &b_pts,
            holes: NO_HOLES,
        };
        assert!(faces_intersect(&a, &b, 1e-8));
    }

    #[test]
    fn coplanar_overlapping_quads() {
        let a_pts = quad_xy();
        let b_pts = vec![
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
        ];
        let plane_a = Plane::best_fit(&a_pts).unwrap();
        let plane_b = Plane::best_fit(&b_pts).unwrap();
        let a = PlanarFace {
            plane: &plane_a,
            outer: &a_pts,
            holes: NO_HOLES,
        };
        let b = PlanarFace {
            plane: &plane_b,
            outer: &b_pts,
            holes: NO_HOLES,
        };
        assert!(faces_intersect(&a, &b, 1e-8));
    }

    // ── ray_x_crossing ──

    #[test]
    fn ray_hits_face_ahead() {
        let face_pts = vec![
            p(2.0, -1.0, -1.0),
            p(2.0, 1.0, -1.0),
            p(2.0, 1.0, 1.0),
            p(2.0, -1.0, 1.0),
        ];
        let plane = Plane::best_fit(&face_pts).unwrap();
        let face = PlanarFace {
            plane: &plane,
            outer: &face_pts,
            holes: NO_HOLES,
        };
        let t = ray_x_crossing(&p(0.0, 0.0, 0.0), &face);
        assert!(t.is_some());
        assert!((t.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ray_misses_face_behind_or_aside() {
        let face_pts = vec![
            p(2.0, -1.0, -1.0),
            p(2.0, 1.0, -1.0),
            p(2.0, 1.0, 1.0),
            p(2.0, -1.0, 1.0),
        ];
        let plane = Plane::best_fit(&face_pts).unwrap();
        let face = PlanarFace {
            plane: &plane,
            outer: &face_pts,
            holes: NO_HOLES,
        };
        assert!(ray_x_crossing(&p(3.0, 0.0, 0.0), &face).is_none());
        assert!(ray_x_crossing(&p(0.0, 5.0, 0.0), &face).is_none());
    }
}

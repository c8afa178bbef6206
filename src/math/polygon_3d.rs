use crate::geometry::plane::newell_normal;
use crate::geometry::Plane;

use super::polygon_2d::{locate_point_in_ring, PointLocation};
use super::{Point2, Point3, TOLERANCE};

/// Projects a ring of 3D points into a plane's UV space.
#[must_use]
pub fn project_ring(plane: &Plane, points: &[Point3]) -> Vec<Point2> {
    points.iter().map(|p| plane.to_2d(p)).collect()
}

/// Largest absolute distance from any point to the plane.
#[must_use]
pub fn max_distance_to_plane(points: &[Point3], plane: &Plane) -> f64 {
    points
        .iter()
        .map(|p| plane.signed_distance(p).abs())
        .fold(0.0, f64::max)
}

/// Largest deviation, in degrees, between the normals of consecutive fan
/// triangles of the ring.
///
/// Catches folded rings whose vertices all sit close to the fitted plane.
/// Degenerate (near zero-area) fan triangles are skipped.
#[must_use]
pub fn fan_normal_deviation_deg(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 4 {
        return 0.0;
    }
    let origin = &points[0];
    let mut reference: Option<super::Vector3> = None;
    let mut worst: f64 = 0.0;
    for i in 1..n - 1 {
        let a = points[i] - origin;
        let b = points[i + 1] - origin;
        let cross = a.cross(&b);
        let len = cross.norm();
        if len < TOLERANCE {
            continue;
        }
        let normal = cross / len;
        match reference {
            None => reference = Some(normal),
            Some(ref r) => {
                let dot = r.dot(&normal).clamp(-1.0, 1.0);
                let sin = r.cross(&normal).norm();
                let angle = sin.atan2(dot).to_degrees();
                worst = worst.max(angle);
            }
        }
    }
    worst
}

/// Area of a closed 3D polygon ring (half the Newell normal magnitude).
#[must_use]
pub fn ring_area_3d(points: &[Point3]) -> f64 {
    0.5 * newell_normal(points).norm()
}

/// An interior point of a planar face, lifted back to 3D.
///
/// Returns `None` for degenerate rings whose interior cannot be sampled.
#[must_use]
pub fn interior_point_3d(plane: &Plane, outer: &[Point3]) -> Option<Point3> {
    if outer.len() < 3 {
        return None;
    }
    let ring_2d = project_ring(plane, outer);
    let ip = super::polygon_2d::interior_point(&ring_2d);
    if locate_point_in_ring(&ip, &ring_2d) != PointLocation::Inside {
        return None;
    }
    Some(plane.origin() + plane.u_dir() * ip.x + plane.v_dir() * ip.y)
}

/// Tests whether a point lies inside a planar face with holes, after
/// projecting everything to the face plane.
///
/// Boundary contact counts as inside.
#[must_use]
pub fn face_contains_point(
    point: &Point3,
    plane: &Plane,
    outer: &[Point3],
    holes: &[Vec<Point3>],
) -> bool {
    let p = plane.to_2d(point);
    let outer_2d = project_ring(plane, outer);
    match locate_point_in_ring(&p, &outer_2d) {
        PointLocation::Outside => false,
        PointLocation::OnBoundary => true,
        PointLocation::Inside => {
            for hole in holes {
                let hole_2d = project_ring(plane, hole);
                if locate_point_in_ring(&p, &hole_2d) == PointLocation::Inside {
                    return false;
                }
            }
            true
        }
    }
}

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin point, and two orthogonal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`.
///
/// Parametric form: `P(u, v) = origin + u * u_dir + v * v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Fits a plane through a point cloud: Newell normal anchored at the
    /// vertex centroid.
    ///
    /// For the near-planar rings the validator feeds it, this is equivalent
    /// within tolerance to a least-squares fit, and it is deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are collinear or fewer than three.
    pub fn best_fit(points: &[Point3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(
                GeometryError::Degenerate("plane fit needs at least 3 points".into()).into(),
            );
        }
        let normal = newell_normal(points);
        if normal.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("points are collinear".into()).into());
        }
        let centroid = points_centroid(points);
        Self::from_normal(centroid, normal)
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the normal vector of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Projects a 3D point into the plane's UV coordinate system.
    #[must_use]
    pub fn to_2d(&self, point: &Point3) -> Point2 {
        let diff = point - self.origin;
        Point2::new(diff.dot(&self.u_dir), diff.dot(&self.v_dir))
    }

    /// Signed distance from a point to the plane.
    /// Positive on the normal side, negative opposite.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&(point - self.origin))
    }
}

/// Newell's method: area-weighted normal of a closed polygon.
///
/// The result is not normalized; its magnitude is twice the polygon area.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

fn points_centroid(points: &[Point3]) -> Point3 {
    let mut c = Vector3::new(0.0, 0.0, 0.0);
    for p in points {
        c += p.coords;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    Point3::from(c / n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn from_normal_builds_orthonormal_frame() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 2.0)).unwrap();
        assert!((plane.u_dir().norm() - 1.0).abs() < TOLERANCE);
        assert!((plane.v_dir().norm() - 1.0).abs() < TOLERANCE);
        assert!(plane.u_dir().dot(plane.v_dir()).abs() < TOLERANCE);
        assert!((plane.plane_normal().z.abs() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn from_normal_rejects_zero_vector() {
        assert!(Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn best_fit_of_tilted_quad() {
        let pts = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 0.0),
        ];
        let plane = Plane::best_fit(&pts).unwrap();
        for pt in &pts {
            assert!(plane.signed_distance(pt).abs() < 1e-9);
        }
    }

    #[test]
    fn best_fit_rejects_collinear_points() {
        let pts = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        assert!(Plane::best_fit(&pts).is_err());
    }

    #[test]
    fn to_2d_round_trips_in_plane() {
        let plane = Plane::from_normal(p(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let uv = plane.to_2d(&p(3.0, 4.0, 5.0));
        let back = plane.origin() + plane.u_dir() * uv.x + plane.v_dir() * uv.y;
        assert!((back - p(3.0, 4.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn signed_distance_sides() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(plane.signed_distance(&p(0.0, 0.0, 2.0)) > 0.0);
        assert!(plane.signed_distance(&p(0.0, 0.0, -2.0)) < 0.0);
        assert!(plane.signed_distance(&p(7.0, 7.0, 0.0)).abs() < TOLERANCE);
    }
}

use crate::math::Point3;

/// How a ring's closure is expressed in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingClosure {
    /// The edge from the last vertex back to the first is implied
    /// (POLY and OFF convention).
    Implicit,
    /// The closing vertex is stored explicitly and must coincide with the
    /// first vertex (GML-style convention).
    Explicit,
}

/// A closed polyline bounding a planar region or hole.
///
/// Read-only after construction; owned by the polygon that declares it.
#[derive(Debug, Clone)]
pub struct Ring {
    points: Vec<Point3>,
    closure: RingClosure,
}

impl Ring {
    /// Creates an implicitly closed ring (no repeated closing vertex).
    #[must_use]
    pub fn implicit(points: Vec<Point3>) -> Self {
        Self {
            points,
            closure: RingClosure::Implicit,
        }
    }

    /// Creates a ring whose source stored the closing vertex explicitly.
    ///
    /// Whether the closing vertex actually coincides with the first is a
    /// validation concern, not a construction error.
    #[must_use]
    pub fn explicit(points: Vec<Point3>) -> Self {
        Self {
            points,
            closure: RingClosure::Explicit,
        }
    }

    /// The stored vertex sequence, closing vertex included when explicit.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn closure(&self) -> RingClosure {
        self.closure
    }

    /// The ring's vertex cycle without the explicit closing vertex.
    ///
    /// All geometric predicates work on this view and treat the last->first
    /// edge as implied.
    #[must_use]
    pub fn cycle(&self) -> &[Point3] {
        match self.closure {
            RingClosure::Implicit => &self.points,
            RingClosure::Explicit if self.points.len() > 1 => {
                &self.points[..self.points.len() - 1]
            }
            RingClosure::Explicit => &self.points,
        }
    }
}

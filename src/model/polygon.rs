use super::ring::Ring;

/// A planar face: one outer ring plus zero or more hole rings, all owned.
///
/// The validity invariants (holes strictly inside the outer ring, no mutual
/// contact) are checked by the polygon validator, never assumed here.
#[derive(Debug, Clone)]
pub struct Polygon {
    outer: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    #[must_use]
    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    #[must_use]
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// All rings of the polygon, outer first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}

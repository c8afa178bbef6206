use super::polygon::Polygon;

/// An ordered collection of polygons that, when valid in solid mode, forms a
/// closed 2-manifold surface.
///
/// Vertices shared between polygons are value-equal, not reference-shared;
/// the shell validator matches edges by snapped coordinates.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    polygons: Vec<Polygon>,
}

impl Shell {
    #[must_use]
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

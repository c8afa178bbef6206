/// Granularity at which a defect was attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Ring,
    Polygon,
    Shell,
    Solid,
}

/// The stable defect taxonomy.
///
/// Ranges by level: 1xx ring, 2xx polygon, 3xx shell, 4xx solid. The mapping
/// is total and stable: the same defect always reports the same number
/// across runs. 999 is reserved for predicates that could not be evaluated;
/// it keeps numeric trouble inside the report instead of crashing the
/// driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // -- ring level --
    TooFewPoints = 101,
    ConsecutivePointsSame = 102,
    RingNotClosed = 103,
    RingNotPlanar = 104,
    // -- polygon level --
    RingSelfIntersection = 201,
    DuplicatedRings = 202,
    InnerRingOutside = 203,
    InnerRingsOverlap = 204,
    InteriorDisconnected = 205,
    InnerRingTouchesOuter = 206,
    InnerRingsNested = 207,
    OrientationRingsSame = 208,
    // -- shell level --
    TooFewPolygons = 301,
    ShellNotClosed = 302,
    ShellSelfIntersection = 303,
    NonManifoldCase = 304,
    MultipleConnectedComponents = 305,
    InconsistentOrientation = 306,
    DanglingFace = 307,
    // -- solid level --
    InnerShellIntersectsOuter = 401,
    InnerShellOutside = 402,
    InnerShellsIntersect = 403,
    InnerShellWrongOrientation = 404,
    OuterShellWrongOrientation = 405,
    // -- any level --
    CouldNotEvaluate = 999,
}

impl ErrorCode {
    /// The numeric code reported to consumers.
    #[must_use]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// One-line description for report output.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::TooFewPoints => "ring has fewer than 3 distinct points",
            Self::ConsecutivePointsSame => "ring has two consecutive identical points",
            Self::RingNotClosed => "ring is not closed",
            Self::RingNotPlanar => "ring is not planar within tolerance",
            Self::RingSelfIntersection => "ring self-intersects",
            Self::DuplicatedRings => "polygon has two identical rings",
            Self::InnerRingOutside => "inner ring lies outside the outer ring",
            Self::InnerRingsOverlap => "inner rings overlap or touch",
            Self::InteriorDisconnected => "polygon interior is disconnected",
            Self::InnerRingTouchesOuter => "inner ring touches the outer ring",
            Self::InnerRingsNested => "inner ring lies inside another inner ring",
            Self::OrientationRingsSame => "inner ring wound in the same direction as the outer",
            Self::TooFewPolygons => "shell has too few polygons",
            Self::ShellNotClosed => "shell is not closed",
            Self::ShellSelfIntersection => "shell self-intersects",
            Self::NonManifoldCase => "shell has a non-manifold configuration",
            Self::MultipleConnectedComponents => "shell has multiple connected components",
            Self::InconsistentOrientation => "shell polygons are inconsistently oriented",
            Self::DanglingFace => "shell has a collapsed polygon forming a dangling edge",
            Self::InnerShellIntersectsOuter => "inner shell intersects the outer shell",
            Self::InnerShellOutside => "inner shell is not inside the outer shell",
            Self::InnerShellsIntersect => "inner shells intersect",
            Self::InnerShellWrongOrientation => "inner shell is not oriented towards its cavity",
            Self::OuterShellWrongOrientation => "outer shell is oriented inside-out",
            Self::CouldNotEvaluate => "a geometric predicate could not be evaluated",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --- {}", self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_sit_in_their_level_ranges() {
        assert_eq!(ErrorCode::TooFewPoints.code(), 101);
        assert_eq!(ErrorCode::RingNotPlanar.code(), 104);
        assert_eq!(ErrorCode::InnerRingOutside.code(), 203);
        assert_eq!(ErrorCode::DanglingFace.code(), 307);
        assert_eq!(ErrorCode::OuterShellWrongOrientation.code(), 405);
    }

    #[test]
    fn display_includes_description() {
        let s = ErrorCode::ShellNotClosed.to_string();
        assert!(s.starts_with("302"));
        assert!(s.contains("not closed"));
    }
}

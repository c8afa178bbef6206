use tracing::debug;

use crate::geometry::Plane;
use crate::math::polygon_3d::{fan_normal_deviation_deg, max_distance_to_plane};
use crate::math::{points_coincide, Point3};
use crate::model::{Ring, RingClosure};

use super::codes::{ErrorCode, Level};
use super::report::ErrorRecord;
use super::Config;

/// Result of validating one ring in isolation.
///
/// A ring that fails any check does not survive: it is excluded from the
/// polygon-level containment and orientation checks.
#[derive(Debug)]
pub struct RingOutcome {
    pub survives: bool,
    pub records: Vec<ErrorRecord>,
    /// The cycle with consecutive duplicates snapped away; what the polygon
    /// validator should work on when the ring survives.
    pub cleaned: Vec<Point3>,
}

/// Checks a single ring: closure, degeneracy, repeated points, planarity.
///
/// Independent defect families are all evaluated; within a family the first
/// finding stops further probing of that family.
#[must_use]
pub fn validate_ring(ring: &Ring, label: &str, cfg: &Config) -> RingOutcome {
    let mut records = Vec::new();

    if ring.closure() == RingClosure::Explicit {
        let pts = ring.points();
        let closed = match (pts.first(), pts.last()) {
            (Some(first), Some(last)) => points_coincide(first, last, cfg.snap_tolerance),
            _ => false,
        };
        if !closed {
            debug!(ring = label, "ring not closed");
            records.push(ErrorRecord::new(ErrorCode::RingNotClosed, Level::Ring, label));
        }
    }

    let cycle = ring.cycle();
    let (cleaned, had_duplicates) = dedup_cycle(cycle, cfg.snap_tolerance);

    if had_duplicates {
        debug!(ring = label, "consecutive identical points");
        records.push(ErrorRecord::new(
            ErrorCode::ConsecutivePointsSame,
            Level::Ring,
            label,
        ));
    }

    let mut degenerate = cleaned.len() < 3;
    let mut plane = None;
    if !degenerate {
        match Plane::best_fit(&cleaned) {
            Ok(p) => plane = Some(p),
            // Collinear cycles bound no area; degenerate like a 2-point ring.
            Err(_) => degenerate = true,
        }
    }
    if degenerate {
        debug!(ring = label, "degenerate ring");
        records.push(ErrorRecord::new(ErrorCode::TooFewPoints, Level::Ring, label));
    }

    if let Some(plane) = plane {
        if cleaned.len() > 3 {
            let d = max_distance_to_plane(&cleaned, &plane);
            if d > cfg.planarity_d2p {
                debug!(ring = label, distance = d, "ring not planar (distance to plane)");
                records.push(ErrorRecord::new(ErrorCode::RingNotPlanar, Level::Ring, label));
            } else {
                let dev = fan_normal_deviation_deg(&cleaned);
                if dev > cfg.planarity_n_deg {
                    debug!(ring = label, deviation = dev, "ring not planar (normal deviation)");
                    records.push(ErrorRecord::new(ErrorCode::RingNotPlanar, Level::Ring, label));
                }
            }
        }
    }

    RingOutcome {
        survives: records.is_empty(),
        records,
        cleaned,
    }
}

/// Removes consecutive coincident vertices (including the wraparound pair).
/// Returns the cleaned cycle and whether anything was removed.
fn dedup_cycle(cycle: &[Point3], tol: f64) -> (Vec<Point3>, bool) {
    let mut cleaned: Vec<Point3> = Vec::with_capacity(cycle.len());
    for p in cycle {
        match cleaned.last() {
            Some(last) if points_coincide(last, p, tol) => {}
            _ => cleaned.push(*p),
        }
    }
    while cleaned.len() > 1 {
        // Wraparound duplicate.
        let first = cleaned[0];
        match cleaned.last() {
            Some(last) if points_coincide(&first, last, tol) => {
                cleaned.pop();
            }
            _ => break,
        }
    }
    let had_duplicates = cleaned.len() != cycle.len();
    (cleaned, had_duplicates)
}

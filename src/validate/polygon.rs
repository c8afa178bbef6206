use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::FixedFaceHandle;
use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint2, Triangulation};
use tracing::debug;

use crate::geometry::Plane;
use crate::math::intersect_2d::SegmentRelation;
use crate::math::polygon_2d::{
    ring_boundaries_relation, ring_self_intersects, ring_strictly_inside, rings_identical,
    signed_area_2d,
};
use crate::math::polygon_3d::project_ring;
use crate::math::{Point2, Point3};

use super::codes::{ErrorCode, Level};
use super::report::ErrorRecord;
use super::Config;

/// Result of validating one polygon with its surviving rings.
#[derive(Debug)]
pub struct PolygonOutcome {
    pub survives: bool,
    pub records: Vec<ErrorRecord>,
    /// Best-fit plane of the outer ring, when one could be computed.
    pub plane: Option<Plane>,
}

/// Checks a polygon as a 2D figure: ring simplicity, ring containment,
/// interior connectivity, relative ring orientation.
///
/// `outer` and `holes` are cleaned cycles of rings that passed the ring
/// checks; `holes` carries the original inner-ring indices so the report
/// contexts keep the input numbering. All geometry is projected to the
/// best-fit plane of the outer ring first.
#[must_use]
pub fn validate_polygon(
    outer: &[Point3],
    holes: &[(usize, Vec<Point3>)],
    label: &str,
    cfg: &Config,
) -> PolygonOutcome {
    let mut records = Vec::new();

    let plane = match Plane::best_fit(outer) {
        Ok(p) => p,
        Err(_) => {
            records.push(ErrorRecord::new(
                ErrorCode::CouldNotEvaluate,
                Level::Polygon,
                label,
            ));
            return PolygonOutcome {
                survives: false,
                records,
                plane: None,
            };
        }
    };
    let outer_2d = project_ring(&plane, outer);

    let mut outer_ok = true;
    if ring_self_intersects(&outer_2d) {
        debug!(polygon = label, "outer ring self-intersects");
        records.push(ErrorRecord::new(
            ErrorCode::RingSelfIntersection,
            Level::Polygon,
            format!("{label}, outer ring"),
        ));
        outer_ok = false;
    }

    let mut simple: Vec<(usize, Vec<Point2>)> = Vec::new();
    for (idx, hole) in holes {
        let hole_2d = project_ring(&plane, hole);
        if ring_self_intersects(&hole_2d) {
            debug!(polygon = label, ring = idx, "inner ring self-intersects");
            records.push(ErrorRecord::new(
                ErrorCode::RingSelfIntersection,
                Level::Polygon,
                format!("{label}, inner ring {idx}"),
            ));
        } else {
            simple.push((*idx, hole_2d));
        }
    }

    // Duplicate rings are reported once and dropped from the relation checks.
    let mut kept: Vec<(usize, Vec<Point2>)> = Vec::new();
    for (idx, hole_2d) in simple {
        let dup_of_outer = outer_ok && rings_identical(&hole_2d, &outer_2d, cfg.snap_tolerance);
        let dup_of_prev = kept
            .iter()
            .any(|(_, k)| rings_identical(&hole_2d, k, cfg.snap_tolerance));
        if dup_of_outer || dup_of_prev {
            records.push(ErrorRecord::new(
                ErrorCode::DuplicatedRings,
                Level::Polygon,
                format!("{label}, inner ring {idx}"),
            ));
        } else {
            kept.push((idx, hole_2d));
        }
    }

    if !outer_ok {
        // Containment and connectivity are meaningless against a
        // self-intersecting outer boundary.
        return PolygonOutcome {
            survives: false,
            records,
            plane: Some(plane),
        };
    }

    // Boundary crossings and overlaps would also make the triangulation
    // constraints intersect, so the connectivity check is skipped for them.
    let mut triangulable = true;
    // Misplaced holes make the parity classification meaningless too.
    let mut containment_ok = true;

    for (idx, hole_2d) in &kept {
        let ctx = format!("{label}, inner ring {idx}");
        match ring_boundaries_relation(hole_2d, &outer_2d) {
            SegmentRelation::Crossing => {
                records.push(ErrorRecord::new(
                    ErrorCode::InnerRingOutside,
                    Level::Polygon,
                    ctx,
                ));
                triangulable = false;
            }
            SegmentRelation::Overlapping => {
                records.push(ErrorRecord::new(
                    ErrorCode::InnerRingTouchesOuter,
                    Level::Polygon,
                    ctx,
                ));
                triangulable = false;
            }
            SegmentRelation::Touching => {
                records.push(ErrorRecord::new(
                    ErrorCode::InnerRingTouchesOuter,
                    Level::Polygon,
                    ctx,
                ));
            }
            SegmentRelation::Disjoint => {
                if !ring_strictly_inside(hole_2d, &outer_2d) {
                    records.push(ErrorRecord::new(
                        ErrorCode::InnerRingOutside,
                        Level::Polygon,
                        ctx,
                    ));
                    containment_ok = false;
                }
            }
        }
    }

    for i in 0..kept.len() {
        for j in (i + 1)..kept.len() {
            let (ia, a) = &kept[i];
            let (ib, b) = &kept[j];
            let ctx = format!("{label}, inner rings {ia} and {ib}");
            match ring_boundaries_relation(a, b) {
                SegmentRelation::Crossing | SegmentRelation::Overlapping => {
                    records.push(ErrorRecord::new(
                        ErrorCode::InnerRingsOverlap,
                        Level::Polygon,
                        ctx,
                    ));
                    triangulable = false;
                }
                SegmentRelation::Touching => {
                    records.push(ErrorRecord::new(
                        ErrorCode::InnerRingsOverlap,
                        Level::Polygon,
                        ctx,
                    ));
                }
                SegmentRelation::Disjoint => {
                    if ring_strictly_inside(a, b) || ring_strictly_inside(b, a) {
                        records.push(ErrorRecord::new(
                            ErrorCode::InnerRingsNested,
                            Level::Polygon,
                            ctx,
                        ));
                        containment_ok = false;
                    }
                }
            }
        }
    }

    let outer_ccw = signed_area_2d(&outer_2d) > 0.0;
    for (idx, hole_2d) in &kept {
        if (signed_area_2d(hole_2d) > 0.0) == outer_ccw {
            records.push(ErrorRecord::new(
                ErrorCode::OrientationRingsSame,
                Level::Polygon,
                format!("{label}, inner ring {idx}"),
            ));
        }
    }

    // Holes touching the boundary or each other can pinch the interior apart
    // without any boundary crossing; the triangulation settles it.
    if triangulable && containment_ok && !kept.is_empty() {
        let hole_refs: Vec<&[Point2]> = kept.iter().map(|(_, h)| h.as_slice()).collect();
        match interior_components(&outer_2d, &hole_refs) {
            Some(n) if n > 1 => {
                debug!(polygon = label, components = n, "interior disconnected");
                records.push(ErrorRecord::new(
                    ErrorCode::InteriorDisconnected,
                    Level::Polygon,
                    label,
                ));
            }
            Some(_) => {}
            None => {
                records.push(ErrorRecord::new(
                    ErrorCode::CouldNotEvaluate,
                    Level::Polygon,
                    label,
                ));
            }
        }
    }

    PolygonOutcome {
        survives: records.is_empty(),
        records,
        plane: Some(plane),
    }
}

/// Counts the connected components of the polygon interior.
///
/// Triangulates outer ring and holes with constrained Delaunay, classifies
/// triangles by constraint-crossing depth parity, then flood-fills interior
/// triangles without crossing constraint edges. Returns `None` if the
/// constraints cannot be inserted.
fn interior_components(outer: &[Point2], holes: &[&[Point2]]) -> Option<usize> {
    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    insert_ring_constraints(&mut cdt, outer)?;
    for hole in holes {
        insert_ring_constraints(&mut cdt, hole)?;
    }

    let interior = classify_interior_faces(&cdt);

    let mut seen: HashSet<usize> = HashSet::new();
    let mut components = 0usize;
    for face in cdt.inner_faces() {
        let idx = face.fix().index();
        if !interior.contains(&idx) || seen.contains(&idx) {
            continue;
        }
        components += 1;
        seen.insert(idx);
        let mut queue: VecDeque<FixedFaceHandle<spade::handles::InnerTag>> = VecDeque::new();
        queue.push_back(face.fix());
        while let Some(fix) = queue.pop_front() {
            for edge in cdt.face(fix).adjacent_edges() {
                if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    continue;
                }
                if let Some(neighbor) = edge.rev().face().as_inner() {
                    let n_idx = neighbor.fix().index();
                    if interior.contains(&n_idx) && seen.insert(n_idx) {
                        queue.push_back(neighbor.fix());
                    }
                }
            }
        }
    }
    Some(components)
}

/// Inserts a closed ring as constraint edges. Returns `None` when a point
/// cannot be inserted or a constraint would cross an existing one.
fn insert_ring_constraints(
    cdt: &mut ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
    ring: &[Point2],
) -> Option<()> {
    if ring.len() < 3 {
        return None;
    }
    let mut handles = Vec::with_capacity(ring.len());
    for p in ring {
        handles.push(cdt.insert(SpadePoint2::new(p.x, p.y)).ok()?);
    }
    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return None;
        }
        cdt.add_constraint(from, to);
    }
    Some(())
}

/// Classifies which inner faces lie inside the polygon using flood-fill.
///
/// Faces adjacent to the outer (infinite) face start at depth 0; each
/// constraint edge crossed increments the depth. Odd depth means inside the
/// outer ring but outside any hole.
fn classify_interior_faces(
    cdt: &ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            if let Some(inner) = edge.rev().face().as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            if let Some(neighbor) = edge.rev().face().as_inner() {
                let n_idx = neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((neighbor.fix(), new_depth));
            }
        }
    }

    interior
}

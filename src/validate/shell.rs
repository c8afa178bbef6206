use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::geometry::Plane;
use crate::math::intersect_3d::{clip_segment_to_face, faces_intersect, PlanarFace};
use crate::math::polygon_3d::{face_contains_point, ring_area_3d};
use crate::math::Point3;
use crate::model::Shell;

use super::codes::{ErrorCode, Level};
use super::polygon::validate_polygon;
use super::report::ErrorRecord;
use super::ring::validate_ring;
use super::Config;

/// What the surface is expected to form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// Bounds a volume: every edge must be used exactly twice.
    Closed,
    /// Composite surface: connected and free of overlaps, closedness not
    /// required.
    Composite,
}

/// One polygon that passed the ring and polygon checks, with its fitted
/// plane and cleaned cycles. The topology checks and the solid-level
/// containment tests run on these.
#[derive(Debug)]
pub struct FacePatch {
    /// Index of the polygon in the input shell.
    pub index: usize,
    pub plane: Plane,
    pub outer: Vec<Point3>,
    pub holes: Vec<Vec<Point3>>,
}

/// Result of validating one shell.
#[derive(Debug)]
pub struct ShellOutcome {
    pub survives: bool,
    pub records: Vec<ErrorRecord>,
    /// Face patches that survived the face-level checks.
    pub faces: Vec<FacePatch>,
    /// Signed enclosed volume, available for closed and consistently
    /// oriented shells. Positive means outward-facing polygons.
    pub signed_volume: Option<f64>,
}

/// A closed shell needs at least a tetrahedron's worth of polygons.
const MIN_CLOSED_POLYGONS: usize = 4;

/// Runs the ring and polygon checks for every polygon of a shell.
///
/// Returns the accumulated records and the face patches that survived
/// their ring and polygon checks; defective faces are excluded.
#[must_use]
pub fn validate_faces(
    shell: &Shell,
    label: &str,
    cfg: &Config,
) -> (Vec<ErrorRecord>, Vec<FacePatch>) {
    let mut records = Vec::new();
    let mut patches = Vec::new();

    for (fi, poly) in shell.polygons().iter().enumerate() {
        let plabel = format!("{label}, polygon {fi}");
        let outer_out = validate_ring(poly.outer(), &format!("{plabel}, outer ring"), cfg);

        let mut holes = Vec::new();
        let mut rings_ok = outer_out.survives;
        for (hi, hole) in poly.holes().iter().enumerate() {
            let hole_out = validate_ring(hole, &format!("{plabel}, inner ring {hi}"), cfg);
            if hole_out.survives {
                holes.push((hi, hole_out.cleaned));
            } else {
                rings_ok = false;
            }
            records.extend(hole_out.records);
        }
        let outer_ok = outer_out.survives;
        let outer_cleaned = outer_out.cleaned;
        records.extend(outer_out.records);
        if !outer_ok {
            continue;
        }

        let poly_out = validate_polygon(&outer_cleaned, &holes, &plabel, cfg);
        if rings_ok && poly_out.survives {
            if let Some(plane) = poly_out.plane {
                patches.push(FacePatch {
                    index: fi,
                    plane,
                    outer: outer_cleaned,
                    holes: holes.into_iter().map(|(_, h)| h).collect(),
                });
            }
        }
        records.extend(poly_out.records);
    }

    (records, patches)
}

/// Validates a shell: per-polygon checks, then surface topology.
///
/// Topology runs on the faces that survived their own checks; a defective
/// face is excluded rather than suppressing the stage, so a ring defect in
/// one polygon never hides a shell-level defect elsewhere. Within the
/// topology stage the structural checks gate the later ones: an unclosed or
/// disconnected shell stops before orientation and self-intersection.
#[must_use]
pub fn validate_shell(shell: &Shell, kind: ShellKind, label: &str, cfg: &Config) -> ShellOutcome {
    let (mut records, patches) = validate_faces(shell, label, cfg);

    let min_polygons = match kind {
        ShellKind::Closed => MIN_CLOSED_POLYGONS,
        ShellKind::Composite => 1,
    };
    if patches.len() < min_polygons {
        records.push(ErrorRecord::new(
            ErrorCode::TooFewPolygons,
            Level::Shell,
            label,
        ));
        return ShellOutcome {
            survives: false,
            records,
            faces: patches,
            signed_volume: None,
        };
    }

    // Degenerate slivers would poison the edge map, so they are reported and
    // set aside before closedness is judged.
    let mut kept: Vec<usize> = Vec::new();
    let mut slivers: Vec<usize> = Vec::new();
    for (i, patch) in patches.iter().enumerate() {
        if patch_width(patch) < cfg.snap_tolerance {
            debug!(shell = label, polygon = patch.index, "sliver polygon");
            records.push(ErrorRecord::new(
                ErrorCode::DanglingFace,
                Level::Shell,
                format!("{label}, polygon {}", patch.index),
            ));
            slivers.push(i);
        } else {
            kept.push(i);
        }
    }

    let edges = build_edge_map(&patches, &kept, cfg.snap_tolerance);

    match kind {
        ShellKind::Closed => {
            let unclosed = edges.values().any(|u| u.forward + u.backward != 2);
            if unclosed {
                debug!(shell = label, "shell not closed");
                records.push(ErrorRecord::new(
                    ErrorCode::ShellNotClosed,
                    Level::Shell,
                    label,
                ));
                return ShellOutcome {
                    survives: false,
                    records,
                    faces: patches,
                    signed_volume: None,
                };
            }
        }
        ShellKind::Composite => {
            let mut over_used = false;
            for use_ in edges.values() {
                if use_.forward + use_.backward > 2 {
                    over_used = true;
                }
            }
            if over_used {
                records.push(ErrorRecord::new(
                    ErrorCode::NonManifoldCase,
                    Level::Shell,
                    label,
                ));
                return ShellOutcome {
                    survives: false,
                    records,
                    faces: patches,
                    signed_volume: None,
                };
            }
        }
    }

    // Faces meeting only at a vertex still count as one component here; the
    // vertex-fan check below decides whether that contact is manifold.
    if connected_components(&patches, &kept, cfg.snap_tolerance) > 1 {
        debug!(shell = label, "multiple connected components");
        records.push(ErrorRecord::new(
            ErrorCode::MultipleConnectedComponents,
            Level::Shell,
            label,
        ));
        return ShellOutcome {
            survives: false,
            records,
            faces: patches,
            signed_volume: None,
        };
    }

    if kind == ShellKind::Closed {
        for vertex in non_manifold_vertices(&edges) {
            debug!(shell = label, ?vertex, "non-manifold vertex");
            records.push(ErrorRecord::new(
                ErrorCode::NonManifoldCase,
                Level::Shell,
                format!("{label}, vertex ({}, {}, {})", vertex.0, vertex.1, vertex.2),
            ));
        }
    }

    let mut oriented = true;
    for use_ in edges.values() {
        if use_.forward + use_.backward == 2 && use_.forward != 1 {
            oriented = false;
        }
    }
    if !oriented {
        debug!(shell = label, "inconsistent polygon orientation");
        records.push(ErrorRecord::new(
            ErrorCode::InconsistentOrientation,
            Level::Shell,
            label,
        ));
    }

    record_self_intersections(&patches, &kept, &slivers, label, cfg, &mut records);

    let structurally_sound = kind == ShellKind::Closed
        && oriented
        && !records
            .iter()
            .any(|r| r.code == ErrorCode::NonManifoldCase);
    let signed_volume = if structurally_sound {
        let faces: Vec<&FacePatch> = kept.iter().map(|&i| &patches[i]).collect();
        Some(shell_signed_volume(&faces))
    } else {
        None
    };

    ShellOutcome {
        survives: records.is_empty(),
        records,
        faces: patches,
        signed_volume,
    }
}

/// Effective width of a face: twice the area over the perimeter. Slivers
/// thinner than the snap tolerance collapse to segments.
fn patch_width(patch: &FacePatch) -> f64 {
    let area = ring_area_3d(&patch.outer);
    let n = patch.outer.len();
    let mut perimeter = 0.0;
    for i in 0..n {
        perimeter += (patch.outer[(i + 1) % n] - patch.outer[i]).norm();
    }
    if perimeter <= f64::EPSILON {
        return 0.0;
    }
    2.0 * area / perimeter
}

type VertexKey = (i64, i64, i64);

#[derive(Debug, Default)]
struct EdgeUse {
    faces: Vec<usize>,
    forward: usize,
    backward: usize,
}

#[allow(clippy::cast_possible_truncation)]
fn snap_key(p: &Point3, snap: f64) -> VertexKey {
    let q = |v: f64| (v / snap).round() as i64;
    (q(p.x), q(p.y), q(p.z))
}

/// Builds the undirected edge map over the kept faces, tracking use counts
/// and traversal directions per edge.
fn build_edge_map(
    patches: &[FacePatch],
    kept: &[usize],
    snap: f64,
) -> HashMap<(VertexKey, VertexKey), EdgeUse> {
    let mut edges: HashMap<(VertexKey, VertexKey), EdgeUse> = HashMap::new();
    for &pi in kept {
        let patch = &patches[pi];
        for ring in std::iter::once(&patch.outer).chain(patch.holes.iter()) {
            let keys: Vec<VertexKey> = ring.iter().map(|p| snap_key(p, snap)).collect();
            let n = keys.len();
            for i in 0..n {
                let a = keys[i];
                let b = keys[(i + 1) % n];
                if a == b {
                    continue;
                }
                let (key, is_forward) = if a <= b { ((a, b), true) } else { ((b, a), false) };
                let use_ = edges.entry(key).or_default();
                use_.faces.push(pi);
                if is_forward {
                    use_.forward += 1;
                } else {
                    use_.backward += 1;
                }
            }
        }
    }
    edges
}

/// Counts connected components of the kept faces, treating any shared
/// snapped vertex as a connection.
fn connected_components(patches: &[FacePatch], kept: &[usize], snap: f64) -> usize {
    if kept.is_empty() {
        return 0;
    }
    let mut by_vertex: HashMap<VertexKey, Vec<usize>> = HashMap::new();
    for &pi in kept {
        let patch = &patches[pi];
        for ring in std::iter::once(&patch.outer).chain(patch.holes.iter()) {
            for p in ring {
                by_vertex.entry(snap_key(p, snap)).or_default().push(pi);
            }
        }
    }

    let mut neighbors: HashMap<usize, HashSet<usize>> = HashMap::new();
    for faces in by_vertex.values() {
        for &a in faces {
            for &b in faces {
                if a != b {
                    neighbors.entry(a).or_default().insert(b);
                }
            }
        }
    }

    let mut seen: HashSet<usize> = HashSet::new();
    let mut components = 0;
    for &start in kept {
        if seen.contains(&start) {
            continue;
        }
        components += 1;
        seen.insert(start);
        let mut queue = VecDeque::from([start]);
        while let Some(f) = queue.pop_front() {
            if let Some(ns) = neighbors.get(&f) {
                for &n in ns {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
    }
    components
}

/// Finds vertices whose incident faces do not form a single fan.
///
/// For each vertex, faces are linked when they share an edge incident to
/// that vertex. Two pyramids glued at an apex yield two fans there.
fn non_manifold_vertices(edges: &HashMap<(VertexKey, VertexKey), EdgeUse>) -> Vec<VertexKey> {
    let mut at_vertex: HashMap<VertexKey, Vec<&EdgeUse>> = HashMap::new();
    for ((a, b), use_) in edges {
        at_vertex.entry(*a).or_default().push(use_);
        at_vertex.entry(*b).or_default().push(use_);
    }

    let mut bad = Vec::new();
    for (vertex, incident) in &at_vertex {
        let mut neighbors: HashMap<usize, HashSet<usize>> = HashMap::new();
        let mut all_faces: HashSet<usize> = HashSet::new();
        for use_ in incident {
            for &a in &use_.faces {
                all_faces.insert(a);
                for &b in &use_.faces {
                    if a != b {
                        neighbors.entry(a).or_default().insert(b);
                    }
                }
            }
        }
        if all_faces.len() < 2 {
            continue;
        }
        let start = match all_faces.iter().next() {
            Some(&f) => f,
            None => continue,
        };
        let mut seen: HashSet<usize> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(f) = queue.pop_front() {
            if let Some(ns) = neighbors.get(&f) {
                for &n in ns {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        if seen.len() != all_faces.len() {
            bad.push(*vertex);
        }
    }
    bad.sort_unstable();
    bad
}

/// Pairwise intersection tests between non-adjacent faces, plus sliver
/// faces tested as segments against the kept faces.
fn record_self_intersections(
    patches: &[FacePatch],
    kept: &[usize],
    slivers: &[usize],
    label: &str,
    cfg: &Config,
    records: &mut Vec<ErrorRecord>,
) {
    let snap = cfg.snap_tolerance;
    let vertex_sets: Vec<HashSet<VertexKey>> = patches
        .iter()
        .map(|patch| {
            patch
                .outer
                .iter()
                .chain(patch.holes.iter().flatten())
                .map(|p| snap_key(p, snap))
                .collect()
        })
        .collect();

    for (ki, &i) in kept.iter().enumerate() {
        for &j in &kept[ki + 1..] {
            if !vertex_sets[i].is_disjoint(&vertex_sets[j]) {
                continue;
            }
            let a = planar_face(&patches[i]);
            let b = planar_face(&patches[j]);
            if faces_intersect(&a, &b, snap) {
                debug!(shell = label, a = patches[i].index, b = patches[j].index, "faces intersect");
                records.push(ErrorRecord::new(
                    ErrorCode::ShellSelfIntersection,
                    Level::Shell,
                    format!(
                        "{label}, polygons {} and {}",
                        patches[i].index, patches[j].index
                    ),
                ));
            }
        }
    }

    for &si in slivers {
        for &i in kept {
            if sliver_touches_face(&patches[si], &patches[i], snap) {
                records.push(ErrorRecord::new(
                    ErrorCode::ShellSelfIntersection,
                    Level::Shell,
                    format!(
                        "{label}, polygons {} and {}",
                        patches[si].index, patches[i].index
                    ),
                ));
            }
        }
    }
}

fn planar_face(patch: &FacePatch) -> PlanarFace<'_> {
    PlanarFace {
        plane: &patch.plane,
        outer: &patch.outer,
        holes: &patch.holes,
    }
}

/// Tests the edges of a sliver face against a proper face, either clipped
/// within the face plane or pierced through it.
fn sliver_touches_face(sliver: &FacePatch, face: &FacePatch, tol: f64) -> bool {
    let pf = planar_face(face);
    let n = sliver.outer.len();
    for i in 0..n {
        let a = &sliver.outer[i];
        let b = &sliver.outer[(i + 1) % n];
        let da = face.plane.signed_distance(a);
        let db = face.plane.signed_distance(b);
        if da.abs() <= tol && db.abs() <= tol {
            let span = (b - a).norm();
            for (t0, t1) in clip_segment_to_face(a, b, &pf) {
                if (t1 - t0) * span > tol {
                    return true;
                }
            }
        } else if da * db < 0.0 {
            let s = da / (da - db);
            let hit = a + (b - a) * s;
            if face_contains_point(&hit, &face.plane, &face.outer, &face.holes) {
                return true;
            }
        }
    }
    false
}

/// Signed volume enclosed by the faces, by summing tetrahedra from the
/// origin over a fan of each ring. Exact for planar faces; hole rings wound
/// opposite to their outer subtract themselves.
fn shell_signed_volume(faces: &[&FacePatch]) -> f64 {
    let mut six_v = 0.0;
    for patch in faces {
        for ring in std::iter::once(&patch.outer).chain(patch.holes.iter()) {
            if ring.len() < 3 {
                continue;
            }
            let r0 = ring[0].coords;
            for i in 1..ring.len() - 1 {
                let a = ring[i].coords;
                let b = ring[i + 1].coords;
                six_v += r0.dot(&a.cross(&b));
            }
        }
    }
    six_v / 6.0
}

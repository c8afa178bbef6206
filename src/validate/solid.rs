use tracing::debug;

use crate::error::Result;
use crate::math::intersect_3d::{faces_intersect, ray_x_crossing, PlanarFace};
use crate::math::{Point3, TOLERANCE};
use crate::model::{GeometryStore, Solid};

use super::codes::{ErrorCode, Level};
use super::report::{ErrorRecord, ValidationReport};
use super::shell::{validate_shell, FacePatch, ShellKind, ShellOutcome};
use super::Config;

/// Validates a solid: its outer shell, each cavity shell, then the
/// relationships between them.
///
/// Shell defects stop the interaction checks; a shell that failed its own
/// validation has no usable geometry to test containment with.
///
/// # Errors
///
/// Returns an error when the solid references a shell that is not in the
/// store.
pub fn validate_solid(
    store: &GeometryStore,
    solid: &Solid,
    cfg: &Config,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();

    let outer_shell = store.shell(solid.outer())?;
    let outer = validate_shell(outer_shell, ShellKind::Closed, "outer shell", cfg);
    report.extend(outer.records.iter().cloned());

    let mut inners: Vec<ShellOutcome> = Vec::new();
    let mut all_survive = outer.survives;
    for (i, &id) in solid.inner().iter().enumerate() {
        let shell = store.shell(id)?;
        let out = validate_shell(shell, ShellKind::Closed, &format!("inner shell {i}"), cfg);
        report.extend(out.records.iter().cloned());
        all_survive &= out.survives;
        inners.push(out);
    }
    if !all_survive {
        return Ok(report);
    }

    if let Some(volume) = outer.signed_volume {
        if volume < 0.0 {
            debug!(volume, "outer shell oriented inside-out");
            report.push(ErrorRecord::new(
                ErrorCode::OuterShellWrongOrientation,
                Level::Solid,
                "outer shell",
            ));
        }
    }
    for (i, inner) in inners.iter().enumerate() {
        if let Some(volume) = inner.signed_volume {
            // A cavity shell faces its own interior, so its enclosed volume
            // comes out negative.
            if volume > 0.0 {
                debug!(shell = i, volume, "cavity shell oriented outward");
                report.push(ErrorRecord::new(
                    ErrorCode::InnerShellWrongOrientation,
                    Level::Solid,
                    format!("inner shell {i}"),
                ));
            }
        }
    }

    for (i, inner) in inners.iter().enumerate() {
        if shells_intersect(&inner.faces, &outer.faces, cfg) {
            debug!(shell = i, "inner shell intersects the outer shell");
            report.push(ErrorRecord::new(
                ErrorCode::InnerShellIntersectsOuter,
                Level::Solid,
                format!("inner shell {i}"),
            ));
        } else if !shell_inside_shell(&inner.faces, &outer.faces) {
            debug!(shell = i, "inner shell outside the outer shell");
            report.push(ErrorRecord::new(
                ErrorCode::InnerShellOutside,
                Level::Solid,
                format!("inner shell {i}"),
            ));
        }
    }

    for i in 0..inners.len() {
        for j in (i + 1)..inners.len() {
            if shells_intersect(&inners[i].faces, &inners[j].faces, cfg) {
                report.push(ErrorRecord::new(
                    ErrorCode::InnerShellsIntersect,
                    Level::Solid,
                    format!("inner shells {i} and {j}"),
                ));
            } else if shell_inside_shell(&inners[i].faces, &inners[j].faces)
                || shell_inside_shell(&inners[j].faces, &inners[i].faces)
            {
                // One cavity swallowing another leaves the swallowed one
                // outside the solid's interior.
                report.push(ErrorRecord::new(
                    ErrorCode::InnerShellOutside,
                    Level::Solid,
                    format!("inner shells {i} and {j}"),
                ));
            }
        }
    }

    Ok(report)
}

/// Pairwise face intersection across two shells.
fn shells_intersect(a: &[FacePatch], b: &[FacePatch], cfg: &Config) -> bool {
    for fa in a {
        let pa = planar(fa);
        for fb in b {
            if faces_intersect(&pa, &planar(fb), cfg.snap_tolerance) {
                return true;
            }
        }
    }
    false
}

/// Tests whether every vertex of shell `a` lies inside (or on) shell `b`.
fn shell_inside_shell(a: &[FacePatch], b: &[FacePatch]) -> bool {
    a.iter()
        .flat_map(|f| f.outer.iter())
        .all(|p| point_in_shell(p, b))
}

/// Ray-parity point-in-shell test along the `+X` axis.
///
/// Crossings at the same parametric distance are collapsed so a ray passing
/// through a shared edge or vertex of the shell counts once.
fn point_in_shell(p: &Point3, faces: &[FacePatch]) -> bool {
    let mut ts: Vec<f64> = faces
        .iter()
        .filter_map(|f| ray_x_crossing(p, &planar(f)))
        .collect();
    ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ts.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE.sqrt());
    ts.len() % 2 == 1
}

fn planar(patch: &FacePatch) -> PlanarFace<'_> {
    PlanarFace {
        plane: &patch.plane,
        outer: &patch.outer,
        holes: &patch.holes,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Polygon, Ring, Shell};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn cfg() -> Config {
        Config::default()
    }

    fn face(points: Vec<Point3>) -> Polygon {
        Polygon::new(Ring::implicit(points), vec![])
    }

    /// Axis-aligned box with outward-facing polygons.
    fn outward_box(lo: Point3, hi: Point3) -> Shell {
        let (x0, y0, z0) = (lo.x, lo.y, lo.z);
        let (x1, y1, z1) = (hi.x, hi.y, hi.z);
        Shell::new(vec![
            face(vec![p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)]),
            face(vec![p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)]),
            face(vec![p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)]),
            face(vec![p(x1, y1, z0), p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1)]),
            face(vec![p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)]),
            face(vec![p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)]),
        ])
    }

    /// Same box with all polygons reversed (inward-facing).
    fn inward_box(lo: Point3, hi: Point3) -> Shell {
        let faces = outward_box(lo, hi)
            .polygons()
            .iter()
            .map(|poly| {
                let mut pts = poly.outer().points().to_vec();
                pts.reverse();
                face(pts)
            })
            .collect();
        Shell::new(faces)
    }

    fn solid_with(
        store: &mut GeometryStore,
        outer: Shell,
        inners: Vec<Shell>,
    ) -> Solid {
        let mut solid = Solid::new(store.add_shell(outer));
        for shell in inners {
            solid.add_inner(store.add_shell(shell));
        }
        solid
    }

    #[test]
    fn plain_cube_is_valid() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0)),
            vec![],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert!(report.is_valid(), "codes: {:?}", report.codes());
    }

    #[test]
    fn cube_with_proper_cavity_is_valid() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0)),
            vec![inward_box(p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0))],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert!(report.is_valid(), "codes: {:?}", report.codes());
    }

    #[test]
    fn inside_out_outer_shell_reports_405() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            inward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0)),
            vec![],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![405]);
    }

    #[test]
    fn outward_cavity_reports_404() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0)),
            vec![outward_box(p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0))],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![404]);
    }

    #[test]
    fn cavity_poking_through_outer_reports_401() {
        let mut store = GeometryStore::new();
        // Cavity straddles the x = 4 wall of the outer box.
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0)),
            vec![inward_box(p(3.0, 1.0, 1.0), p(5.0, 2.0, 2.0))],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![401]);
    }

    #[test]
    fn cavity_fully_outside_reports_402() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0)),
            vec![inward_box(p(6.0, 1.0, 1.0), p(7.0, 2.0, 2.0))],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![402]);
    }

    #[test]
    fn overlapping_cavities_report_403() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(8.0, 8.0, 8.0)),
            vec![
                inward_box(p(1.0, 1.0, 1.0), p(3.0, 3.0, 3.0)),
                inward_box(p(2.0, 2.0, 2.0), p(4.0, 4.0, 4.0)),
            ],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![403]);
    }

    #[test]
    fn nested_cavities_report_402() {
        let mut store = GeometryStore::new();
        let solid = solid_with(
            &mut store,
            outward_box(p(0.0, 0.0, 0.0), p(8.0, 8.0, 8.0)),
            vec![
                inward_box(p(1.0, 1.0, 1.0), p(5.0, 5.0, 5.0)),
                inward_box(p(2.0, 2.0, 2.0), p(3.0, 3.0, 3.0)),
            ],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![402]);
    }

    #[test]
    fn shell_defect_stops_solid_checks() {
        let mut store = GeometryStore::new();
        // Outer box missing a face AND an outward cavity: only 302 shows.
        let mut broken = outward_box(p(0.0, 0.0, 0.0), p(4.0, 4.0, 4.0))
            .polygons()
            .to_vec();
        broken.pop();
        let solid = solid_with(
            &mut store,
            Shell::new(broken),
            vec![outward_box(p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0))],
        );
        let report = validate_solid(&store, &solid, &cfg()).unwrap();
        assert_eq!(report.codes(), vec![302]);
    }

    // ── point_in_shell ──

    #[test]
    fn parity_counts_shared_edges_once() {
        let mut store = GeometryStore::new();
        let id = store.add_shell(outward_box(p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0)));
        let shell = store.shell(id).unwrap();
        let out = validate_shell(shell, ShellKind::Closed, "shell", &cfg());
        assert!(point_in_shell(&p(1.0, 1.0, 1.0), &out.faces));
        assert!(!point_in_shell(&p(3.0, 1.0, 1.0), &out.faces));
        // A point on the boundary counts as inside.
        assert!(point_in_shell(&p(1.0, 0.0, 0.0), &out.faces));
    }
}

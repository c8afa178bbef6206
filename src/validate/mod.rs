//! The validation engine: layered checks over rings, polygons, shells and
//! solids, accumulating numeric defect codes into a [`ValidationReport`].

pub mod codes;
pub mod polygon;
pub mod report;
pub mod ring;
pub mod shell;
pub mod solid;

pub use codes::{ErrorCode, Level};
pub use report::{ErrorRecord, ValidationReport};
pub use shell::ShellKind;

use tracing::{debug, info};

use crate::error::Result;
use crate::model::{GeometryStore, Primitive};

/// Tolerances steering the geometric checks.
///
/// Defaults match the CLI defaults: vertices closer than `snap_tolerance`
/// are the same vertex; a ring is planar when no vertex is farther than
/// `planarity_d2p` from its fitted plane and no fan triangle's normal
/// deviates more than `planarity_n_deg` degrees.
#[derive(Debug, Clone)]
pub struct Config {
    pub snap_tolerance: f64,
    pub planarity_d2p: f64,
    pub planarity_n_deg: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snap_tolerance: 1e-3,
            planarity_d2p: 1e-2,
            planarity_n_deg: 1.0,
        }
    }
}

/// What kind of primitive the input should be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Closed outer shell, optional cavities.
    #[default]
    Solid,
    /// Connected surface, closedness not required.
    CompositeSurface,
    /// Independent polygons, no shell-level topology.
    MultiSurface,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::Solid),
            "CS" => Ok(Self::CompositeSurface),
            "MS" => Ok(Self::MultiSurface),
            other => Err(format!("unknown primitive type {other:?} (S, CS or MS)")),
        }
    }
}

/// Runs the layered validation for one primitive.
///
/// Checks run finest-first: rings, then polygons built from surviving
/// rings, then shell topology over the faces that survived, then
/// solid-level containment and orientation. Defects accumulate across
/// independent structures and levels; a defective substructure is excluded
/// from the coarser checks rather than suppressing them.
#[derive(Debug, Default)]
pub struct Validator {
    config: Config,
}

impl Validator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validates one primitive against the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the primitive references a shell that is not
    /// in the store.
    pub fn validate(&self, store: &GeometryStore, primitive: &Primitive) -> Result<ValidationReport> {
        let report = match primitive {
            Primitive::Solid(solid) => {
                info!(cavities = solid.inner().len(), "validating solid");
                solid::validate_solid(store, solid, &self.config)?
            }
            Primitive::CompositeSurface(id) => {
                info!("validating composite surface");
                let shell = store.shell(*id)?;
                let out =
                    shell::validate_shell(shell, ShellKind::Composite, "surface", &self.config);
                let mut report = ValidationReport::new();
                report.extend(out.records);
                report
            }
            Primitive::MultiSurface(id) => {
                info!("validating multi surface");
                let shell = store.shell(*id)?;
                let (records, _) = shell::validate_faces(shell, "surface", &self.config);
                let mut report = ValidationReport::new();
                report.extend(records);
                report
            }
        };
        debug!(codes = ?report.codes(), "validation finished");
        Ok(report)
    }
}

pub mod polygon;
pub mod ring;
pub mod shell;
pub mod solid;

pub use polygon::Polygon;
pub use ring::{Ring, RingClosure};
pub use shell::Shell;
pub use solid::Solid;

use crate::error::GeometryError;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Unique identifier for a shell in the geometry store.
    pub struct ShellId;
}

/// Central arena that owns all parsed shells.
///
/// Solids reference their outer and inner shells via [`ShellId`]s
/// (generational indices), so the shell graph has no back-references and
/// validation never needs to walk from a shell to its owning solid.
#[derive(Debug, Default)]
pub struct GeometryStore {
    shells: SlotMap<ShellId, Shell>,
}

impl GeometryStore {
    /// Creates a new, empty geometry store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a shell and returns its ID.
    pub fn add_shell(&mut self, shell: Shell) -> ShellId {
        self.shells.insert(shell)
    }

    /// Returns a reference to the shell, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell is not in the store.
    pub fn shell(&self, id: ShellId) -> Result<&Shell, GeometryError> {
        self.shells
            .get(id)
            .ok_or_else(|| GeometryError::EntityNotFound("shell".into()))
    }
}

/// What the driver is asked to validate.
///
/// A solid carries closed-shell and cavity semantics; a composite surface is
/// a shell-shaped polygon collection without the closedness requirement; a
/// multi surface drops shell-level topology entirely and validates each
/// polygon on its own.
#[derive(Debug, Clone)]
pub enum Primitive {
    Solid(Solid),
    CompositeSurface(ShellId),
    MultiSurface(ShellId),
}

use super::ShellId;

/// A volume bounded by one outer shell and zero or more inner shells
/// (cavities), referenced by ID into the [`GeometryStore`](super::GeometryStore).
///
/// Cavity shells are attached before validation begins and never reordered;
/// the reported context strings number them in attachment order.
#[derive(Debug, Clone)]
pub struct Solid {
    outer: ShellId,
    inner: Vec<ShellId>,
}

impl Solid {
    #[must_use]
    pub fn new(outer: ShellId) -> Self {
        Self {
            outer,
            inner: Vec::new(),
        }
    }

    /// Attaches an inner shell as a cavity.
    pub fn add_inner(&mut self, shell: ShellId) {
        self.inner.push(shell);
    }

    #[must_use]
    pub fn outer(&self) -> ShellId {
        self.outer
    }

    #[must_use]
    pub fn inner(&self) -> &[ShellId] {
        &self.inner
    }
}

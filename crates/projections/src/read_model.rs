//! Read model trait for query-side views.

/// A read model providing query access to projected data.
///
/// Read models are rebuilt from the event log at any time and are never the
/// source of truth.
pub trait ReadModel: Send + Sync {
    /// Returns the name of this read model.
    fn name(&self) -> &'static str;

    /// Returns the number of entries in this read model.
    fn count(&self) -> usize;
}

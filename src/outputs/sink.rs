use crate::kernel::event::SinkUpdate;

/// The single display surface. Each update replaces whatever was shown before.
///
/// Writes come from the dispatching caller and from spawned completions, so implementations
/// use interior mutability and must not block for long.
pub trait ResultSink: Send + Sync + 'static {
    fn show(&self, update: SinkUpdate<'_>);
}


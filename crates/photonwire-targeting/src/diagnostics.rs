use std::sync::atomic::{AtomicBool, Ordering};

/// Receives diagnostics about suspicious uses of a [`PipelineResult`].
///
/// [`PipelineResult`]: crate::PipelineResult
pub trait TargetDiagnostics {
    /// A best target was requested from a result with no targets.
    fn no_targets(&self);
}

/// Logs the empty-result warning the first time it is reported, then stays
/// silent for the rest of its lifetime.
///
/// Keep one instance for the life of the process (for example in a `static`)
/// to warn at most once process-wide.
#[derive(Debug, Default)]
pub struct WarnOnce {
    warned: AtomicBool,
}

impl WarnOnce {
    pub const fn new() -> Self {
        Self {
            warned: AtomicBool::new(false),
        }
    }

    /// Returns true once the warning has been emitted.
    pub fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }
}

impl TargetDiagnostics for WarnOnce {
    fn no_targets(&self) {
        if self.warned.swap(true, Ordering::Relaxed) {
            return;
        }
        tracing::warn!(
            "requested the best target of a pipeline result with no targets; \
             check has_targets() before calling best_target()"
        );
    }
}

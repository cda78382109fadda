use std::alloc::Layout;
use thiserror::Error;

/// Failures reported by [`Queue`](crate::Queue) operations.
///
/// None of them leave the queue in a changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("queue handle is absent")]
    Absent,

    #[error("failed to allocate {} bytes", .layout.size())]
    AllocationFailure { layout: Layout },

    #[error("queue is empty")]
    Empty,
}

impl QueueError {
    pub(crate) fn alloc(layout: Layout) -> Self {
        tracing::warn!(size = layout.size(), "queue allocation failed");
        QueueError::AllocationFailure { layout }
    }
}

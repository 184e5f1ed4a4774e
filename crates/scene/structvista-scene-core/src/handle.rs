//! Opaque handles for renderable objects.

use serde::{Deserialize, Serialize};

/// Reference to one renderable object owned by the host scene.
///
/// Handles are never reused by a single allocator, so a stale handle can be
/// detected by the renderer instead of silently addressing a newer object.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Monotonic allocator for [`VisualHandle`].
#[derive(Default, Debug)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> VisualHandle {
        let id = VisualHandle(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Number of handles handed out so far.
    #[inline]
    pub fn issued(&self) -> u32 {
        self.next
    }
}

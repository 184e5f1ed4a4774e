//! Sequence generations.

use serde::{Deserialize, Serialize};

/// Identifies one played sequence. Every new sequence and every reset moves the
/// engine to a fresh generation; work tagged with an older one is discarded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(pub u64);

#[derive(Default, Debug)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Generation {
        self.current
    }

    #[inline]
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.current
    }
}

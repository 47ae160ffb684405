use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::*;
use crate::core::reflection::BSDF;

/// Per-shading-point scratch allocator. BSDFs are plain values here; the arena
/// only counts what it hands out so that callers can reset it between samples.
#[derive(Debug, Default)]
pub struct MemoryArena {
    allocated: usize,
}

impl MemoryArena {
    pub fn new() -> Self {
        MemoryArena { allocated: 0 }
    }

    pub fn reset(&mut self) {
        self.allocated = 0;
    }

    pub fn allocated(&self) -> usize {
        return self.allocated;
    }

    pub fn alloc_bsdf(&mut self, si: &SurfaceInteraction, eta: Float) -> BSDF {
        self.allocated += 1;
        BSDF::new(si, eta)
    }
}

use crate::core::interaction::SurfaceInteraction;
use crate::core::memory::MemoryArena;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

pub trait Material: Send + Sync {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        arena: &mut MemoryArena,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    );
}

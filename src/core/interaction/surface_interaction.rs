use crate::core::pbrt::*;
use std::sync::{Arc, Weak};

#[derive(Default, Debug, Clone, Copy)]
pub struct SurfaceInteractionShading {
    pub n: Normal3f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
}

#[derive(Default, Clone, Debug)]
pub struct SurfaceInteraction {
    pub p: Point3f,
    pub p_error: Vector3f,
    pub n: Normal3f,
    pub time: Float,
    pub wo: Vector3f,
    //-------------
    pub uv: Point2f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
    //-------------
    pub shape: Option<Weak<dyn Shape>>,
    pub primitive: Option<Weak<dyn Primitive>>,
    pub shading: SurfaceInteractionShading,
    pub bsdf: Option<Arc<BSDF>>,
    //-------------
    pub face_index: u32,
}

impl SurfaceInteraction {
    pub fn new(
        p: &Point3f,
        p_error: &Vector3f,
        uv: &Point2f,
        wo: &Vector3f,
        n: &Normal3f,
        dpdu: &Vector3f,
        dpdv: &Vector3f,
        dndu: &Normal3f,
        dndv: &Normal3f,
        time: Float,
        face_index: u32,
    ) -> Self {
        let shading = SurfaceInteractionShading {
            n: *n,
            dpdu: *dpdu,
            dpdv: *dpdv,
            dndu: *dndu,
            dndv: *dndv,
        };
        SurfaceInteraction {
            p: *p,
            p_error: *p_error,
            n: *n,
            time,
            wo: *wo,
            uv: *uv,
            dpdu: *dpdu,
            dpdv: *dpdv,
            dndu: *dndu,
            dndv: *dndv,
            shape: None,
            primitive: None,
            shading,
            bsdf: None,
            face_index,
        }
    }

    pub fn set_shape(&mut self, shape: &Arc<dyn Shape>) {
        self.shape = Some(Arc::downgrade(shape));
    }

    pub fn set_primitive(&mut self, primitive: &Arc<dyn Primitive>) {
        self.primitive = Some(Arc::downgrade(primitive));
    }

    pub fn get_shape(&self) -> Option<Arc<dyn Shape>> {
        return self.shape.as_ref().and_then(|s| s.upgrade());
    }

    pub fn get_primitive(&self) -> Option<Arc<dyn Primitive>> {
        return self.primitive.as_ref().and_then(|p| p.upgrade());
    }

    pub fn set_shading_geometry(
        &mut self,
        dpdus: &Vector3f,
        dpdvs: &Vector3f,
        dndus: &Normal3f,
        dndvs: &Normal3f,
        orientation_is_authoritative: bool,
    ) {
        self.shading.n = Vector3f::cross(dpdus, dpdvs).normalize();
        if orientation_is_authoritative {
            self.n = face_forward(&self.n, &self.shading.n);
        } else {
            self.shading.n = face_forward(&self.shading.n, &self.n);
        }
        self.shading.dpdu = *dpdus;
        self.shading.dpdv = *dpdvs;
        self.shading.dndu = *dndus;
        self.shading.dndv = *dndvs;
    }

    /// Asks the hit primitive's material to attach a BSDF to this interaction.
    pub fn compute_scattering_functions(
        &mut self,
        arena: &mut MemoryArena,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        if let Some(primitive) = self.get_primitive() {
            primitive.compute_scattering_functions(self, arena, mode, allow_multiple_lobes);
        }
    }
}

//! Minimal bindings to the Embree 4 C API and the `RayKernel` built on them.

use super::kernel::*;
use crate::core::error::*;
use crate::core::pbrt::*;

use log::*;
use std::ffi::{c_char, c_void, CString};
use std::sync::Arc;

#[allow(non_camel_case_types)]
type RTCDevice = *mut c_void;
#[allow(non_camel_case_types)]
type RTCScene = *mut c_void;
#[allow(non_camel_case_types)]
type RTCGeometry = *mut c_void;

const RTC_GEOMETRY_TYPE_TRIANGLE: u32 = 0;
const RTC_BUFFER_TYPE_INDEX: u32 = 0;
const RTC_BUFFER_TYPE_VERTEX: u32 = 1;
const RTC_FORMAT_UINT3: u32 = 0x5003;
const RTC_FORMAT_FLOAT3: u32 = 0x9003;
const RTC_INVALID_GEOMETRY_ID: u32 = 0xFFFFFFFF;

#[repr(C, align(16))]
#[derive(Debug, Copy, Clone)]
struct RTCRay {
    org_x: f32,
    org_y: f32,
    org_z: f32,
    tnear: f32,
    dir_x: f32,
    dir_y: f32,
    dir_z: f32,
    time: f32,
    tfar: f32,
    mask: u32,
    id: u32,
    flags: u32,
}

#[repr(C, align(16))]
#[derive(Debug, Copy, Clone)]
struct RTCHit {
    ng_x: f32,
    ng_y: f32,
    ng_z: f32,
    u: f32,
    v: f32,
    prim_id: u32,
    geom_id: u32,
    inst_id: [u32; 1],
    // present when the library is built with instance arrays
    inst_prim_id: [u32; 1],
}

#[repr(C, align(16))]
#[derive(Debug, Copy, Clone)]
struct RTCRayHit {
    ray: RTCRay,
    hit: RTCHit,
}

#[repr(C, align(16))]
#[derive(Debug, Default, Copy, Clone)]
struct RTCBounds {
    lower_x: f32,
    lower_y: f32,
    lower_z: f32,
    align0: f32,
    upper_x: f32,
    upper_y: f32,
    upper_z: f32,
    align1: f32,
}

#[link(name = "embree4")]
extern "C" {
    fn rtcNewDevice(config: *const c_char) -> RTCDevice;
    fn rtcReleaseDevice(device: RTCDevice);
    fn rtcGetDeviceError(device: RTCDevice) -> i32;

    fn rtcNewScene(device: RTCDevice) -> RTCScene;
    fn rtcReleaseScene(scene: RTCScene);
    fn rtcCommitScene(scene: RTCScene);
    fn rtcGetSceneBounds(scene: RTCScene, bounds: *mut RTCBounds);

    fn rtcNewGeometry(device: RTCDevice, geom_type: u32) -> RTCGeometry;
    fn rtcReleaseGeometry(geom: RTCGeometry);
    fn rtcCommitGeometry(geom: RTCGeometry);
    fn rtcAttachGeometryByID(scene: RTCScene, geom: RTCGeometry, geom_id: u32);
    fn rtcSetNewGeometryBuffer(
        geom: RTCGeometry,
        buffer_type: u32,
        slot: u32,
        format: u32,
        byte_stride: usize,
        item_count: usize,
    ) -> *mut c_void;

    fn rtcIntersect1(scene: RTCScene, rayhit: *mut RTCRayHit, args: *const c_void);
    fn rtcOccluded1(scene: RTCScene, ray: *mut RTCRay, args: *const c_void);
}

fn error_name(err: i32) -> &'static str {
    match err {
        1 => "RTC_ERROR_UNKNOWN",
        2 => "RTC_ERROR_INVALID_ARGUMENT",
        3 => "RTC_ERROR_INVALID_OPERATION",
        4 => "RTC_ERROR_OUT_OF_MEMORY",
        5 => "RTC_ERROR_UNSUPPORTED_CPU",
        6 => "RTC_ERROR_CANCELLED",
        _ => "UNKNOWN_ERROR",
    }
}

struct EmbreeDevice {
    handle: RTCDevice,
}

// Embree devices are internally synchronized.
unsafe impl Send for EmbreeDevice {}
unsafe impl Sync for EmbreeDevice {}

impl EmbreeDevice {
    fn check(&self, what: &str) -> Result<(), PbrtError> {
        let err = unsafe { rtcGetDeviceError(self.handle) };
        if err != 0 {
            let msg = format!("embree: {} failed: {} ({})", what, err, error_name(err));
            return Err(PbrtError::error(&msg));
        }
        return Ok(());
    }
}

impl Drop for EmbreeDevice {
    fn drop(&mut self) {
        unsafe {
            rtcReleaseDevice(self.handle);
        }
    }
}

pub struct EmbreeKernel {
    device: Arc<EmbreeDevice>,
}

impl EmbreeKernel {
    /// `config` is passed verbatim to `rtcNewDevice`.
    pub fn new(config: &str) -> Result<Self, PbrtError> {
        let config = CString::new(config)
            .map_err(|_| PbrtError::error("embree: device config contains a NUL byte"))?;
        let ptr = if config.as_bytes().is_empty() {
            std::ptr::null()
        } else {
            config.as_ptr()
        };
        let handle = unsafe { rtcNewDevice(ptr) };
        if handle.is_null() {
            return Err(PbrtError::error("embree: failed to create device"));
        }
        let device = EmbreeDevice { handle };
        device.check("rtcNewDevice")?;
        return Ok(EmbreeKernel {
            device: Arc::new(device),
        });
    }
}

impl RayKernel for EmbreeKernel {
    fn name(&self) -> &str {
        return "embree";
    }

    fn new_scene(&self) -> Result<Box<dyn KernelSceneBuilder>, PbrtError> {
        let scene = unsafe { rtcNewScene(self.device.handle) };
        if scene.is_null() {
            self.device.check("rtcNewScene")?;
            return Err(PbrtError::error("embree: failed to create scene"));
        }
        return Ok(Box::new(EmbreeSceneBuilder {
            device: Arc::clone(&self.device),
            scene,
            geometries: Vec::new(),
        }));
    }
}

struct EmbreeGeometry {
    handle: RTCGeometry,
    vertices: *mut [f32; 4],
    num_vertices: usize,
    indices: *mut [u32; 3],
    num_triangles: usize,
}

pub struct EmbreeSceneBuilder {
    device: Arc<EmbreeDevice>,
    scene: RTCScene,
    geometries: Vec<EmbreeGeometry>,
}

impl KernelSceneBuilder for EmbreeSceneBuilder {
    fn new_triangle_mesh(
        &mut self,
        num_triangles: usize,
        num_vertices: usize,
    ) -> Result<GeomId, PbrtError> {
        let id = self.geometries.len() as GeomId;
        if id == RTC_INVALID_GEOMETRY_ID {
            return Err(PbrtError::error("embree: geometry id space exhausted"));
        }
        unsafe {
            let handle = rtcNewGeometry(self.device.handle, RTC_GEOMETRY_TYPE_TRIANGLE);
            if handle.is_null() {
                self.device.check("rtcNewGeometry")?;
                return Err(PbrtError::error("embree: failed to create geometry"));
            }
            // 16 byte vertex stride keeps the last vertex safe for SSE loads
            let vertices = rtcSetNewGeometryBuffer(
                handle,
                RTC_BUFFER_TYPE_VERTEX,
                0,
                RTC_FORMAT_FLOAT3,
                16,
                num_vertices,
            ) as *mut [f32; 4];
            let indices = rtcSetNewGeometryBuffer(
                handle,
                RTC_BUFFER_TYPE_INDEX,
                0,
                RTC_FORMAT_UINT3,
                12,
                num_triangles,
            ) as *mut [u32; 3];
            if vertices.is_null() || indices.is_null() {
                rtcReleaseGeometry(handle);
                self.device.check("rtcSetNewGeometryBuffer")?;
                return Err(PbrtError::error("embree: failed to allocate geometry buffers"));
            }
            std::ptr::write_bytes(vertices, 0, num_vertices);
            std::ptr::write_bytes(indices, 0, num_triangles);
            rtcAttachGeometryByID(self.scene, handle, id);
            self.geometries.push(EmbreeGeometry {
                handle,
                vertices,
                num_vertices,
                indices,
                num_triangles,
            });
        }
        self.device.check("rtcAttachGeometryByID")?;
        return Ok(id);
    }

    fn map_vertex_buffer(&mut self, id: GeomId) -> &mut [[f32; 4]] {
        let g = &self.geometries[id as usize];
        return unsafe { std::slice::from_raw_parts_mut(g.vertices, g.num_vertices) };
    }

    fn map_index_buffer(&mut self, id: GeomId) -> &mut [[u32; 3]] {
        let g = &self.geometries[id as usize];
        return unsafe { std::slice::from_raw_parts_mut(g.indices, g.num_triangles) };
    }

    fn geometry_count(&self) -> usize {
        return self.geometries.len();
    }

    fn commit(mut self: Box<Self>) -> Result<Box<dyn KernelScene>, PbrtError> {
        let geometry_count = self.geometries.len();
        unsafe {
            // the scene keeps its own reference to every attached geometry
            for g in self.geometries.drain(..) {
                rtcCommitGeometry(g.handle);
                rtcReleaseGeometry(g.handle);
            }
            self.device.check("rtcCommitGeometry")?;
            rtcCommitScene(self.scene);
        }
        self.device.check("rtcCommitScene")?;

        let bounds = if geometry_count == 0 {
            Bounds3f::default()
        } else {
            let mut b = RTCBounds::default();
            unsafe { rtcGetSceneBounds(self.scene, &mut b) };
            Bounds3f::new(
                &Vector3f::new(b.lower_x, b.lower_y, b.lower_z),
                &Vector3f::new(b.upper_x, b.upper_y, b.upper_z),
            )
        };
        let scene = std::mem::replace(&mut self.scene, std::ptr::null_mut());
        debug!("embree: committed scene with {} geometries", geometry_count);
        return Ok(Box::new(EmbreeScene {
            device: Arc::clone(&self.device),
            scene,
            geometry_count,
            bounds,
        }));
    }
}

impl Drop for EmbreeSceneBuilder {
    fn drop(&mut self) {
        unsafe {
            for g in self.geometries.drain(..) {
                rtcReleaseGeometry(g.handle);
            }
            if !self.scene.is_null() {
                rtcReleaseScene(self.scene);
            }
        }
    }
}

pub struct EmbreeScene {
    // keeps the device alive until the scene is released
    device: Arc<EmbreeDevice>,
    scene: RTCScene,
    geometry_count: usize,
    bounds: Bounds3f,
}

// A committed Embree scene is immutable and safe to query concurrently.
unsafe impl Send for EmbreeScene {}
unsafe impl Sync for EmbreeScene {}

impl Drop for EmbreeScene {
    fn drop(&mut self) {
        unsafe {
            rtcReleaseScene(self.scene);
        }
        trace!("embree: released scene (device refs {})", Arc::strong_count(&self.device));
    }
}

fn to_rtc_ray(ray: &KernelRay) -> RTCRay {
    RTCRay {
        org_x: ray.org[0],
        org_y: ray.org[1],
        org_z: ray.org[2],
        tnear: ray.tnear,
        dir_x: ray.dir[0],
        dir_y: ray.dir[1],
        dir_z: ray.dir[2],
        time: ray.time,
        tfar: ray.tfar,
        mask: ray.mask,
        id: 0,
        flags: 0,
    }
}

impl KernelScene for EmbreeScene {
    fn intersect1(&self, ray: &mut KernelRay) {
        let mut rayhit = RTCRayHit {
            ray: to_rtc_ray(ray),
            hit: RTCHit {
                ng_x: 0.0,
                ng_y: 0.0,
                ng_z: 0.0,
                u: 0.0,
                v: 0.0,
                prim_id: RTC_INVALID_GEOMETRY_ID,
                geom_id: RTC_INVALID_GEOMETRY_ID,
                inst_id: [RTC_INVALID_GEOMETRY_ID],
                inst_prim_id: [RTC_INVALID_GEOMETRY_ID],
            },
        };
        unsafe {
            rtcIntersect1(self.scene, &mut rayhit, std::ptr::null());
        }
        if rayhit.hit.geom_id == RTC_INVALID_GEOMETRY_ID {
            return;
        }
        ray.tfar = rayhit.ray.tfar;
        ray.u = rayhit.hit.u;
        ray.v = rayhit.hit.v;
        ray.ng = [rayhit.hit.ng_x, rayhit.hit.ng_y, rayhit.hit.ng_z];
        ray.geom_id = rayhit.hit.geom_id;
        ray.prim_id = rayhit.hit.prim_id;
    }

    fn occluded1(&self, ray: &mut KernelRay) -> bool {
        let mut r = to_rtc_ray(ray);
        unsafe {
            rtcOccluded1(self.scene, &mut r, std::ptr::null());
        }
        ray.tfar = r.tfar;
        return r.tfar == f32::NEG_INFINITY;
    }

    fn geometry_count(&self) -> usize {
        return self.geometry_count;
    }

    fn bounds(&self) -> Bounds3f {
        return self.bounds;
    }
}

use pbrt_r3_plugins::accelerators::*;
use pbrt_r3_plugins::core::pbrt::*;
use pbrt_r3_plugins::shapes::*;

use rayon::prelude::*;
use std::sync::Arc;

struct Lcg(u64);

impl Lcg {
    fn uniform(&mut self) -> Float {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        return ((self.0 >> 40) as Float) / ((1u64 << 24) as Float);
    }

    fn range(&mut self, lo: Float, hi: Float) -> Float {
        return lo + (hi - lo) * self.uniform();
    }
}

fn to_prims(shapes: &[Arc<dyn Shape>]) -> Vec<Arc<dyn Primitive>> {
    return shapes
        .iter()
        .map(|s| -> Arc<dyn Primitive> { Arc::new(GeometricPrimitive::new(s, &None)) })
        .collect();
}

fn triangle_soup(rng: &mut Lcg, n: usize) -> Vec<Arc<dyn Shape>> {
    let mut p = Vec::with_capacity(n * 9);
    for _ in 0..n {
        let c = [rng.range(-10.0, 10.0), rng.range(-10.0, 10.0), rng.range(-10.0, 10.0)];
        for _ in 0..3 {
            for c in c.iter() {
                p.push(c + rng.range(-1.0, 1.0));
            }
        }
    }
    let indices: Vec<i32> = (0..(3 * n) as i32).collect();
    let mut params = ParamSet::new();
    params.add_ints("integer indices", &indices);
    params.add_floats("point P", &p);
    return create_shapes("trianglemesh", false, &params).unwrap();
}

fn sphere(center: &Point3f, radius: Float) -> Arc<dyn Shape> {
    let mut params = ParamSet::new();
    params.add_float("float radius", radius);
    params.add_point3f("point center", center);
    return create_shapes("sphere", false, &params).unwrap().remove(0);
}

fn embree_params(nontriangles: &str) -> ParamSet {
    let mut params = ParamSet::new();
    params.add_string("string kernel", "software");
    params.add_string("string nontriangles", nontriangles);
    return params;
}

fn build(prims: &[Arc<dyn Primitive>], policy: NonTrianglePolicy) -> EmbreeAccel {
    let kernel = SoftwareKernel::default();
    return EmbreeAccel::new(prims, &kernel, policy).unwrap();
}

#[test]
fn geometry_count_and_bound_cover_triangles_only() {
    let mut rng = Lcg(7);
    let triangles = triangle_soup(&mut rng, 64);
    let mut prims = to_prims(&triangles);
    prims.push(Arc::new(GeometricPrimitive::new(
        &sphere(&Point3f::new(50.0, 0.0, 0.0), 2.0),
        &None,
    )));
    prims.push(Arc::new(GeometricPrimitive::new(
        &sphere(&Point3f::new(0.0, -40.0, 0.0), 1.0),
        &None,
    )));

    let accel = build(&prims, NonTrianglePolicy::Skip);
    assert_eq!(accel.geometry_count(), 64);
    assert_eq!(accel.skipped_count(), 2);
    assert_eq!(accel.fallback_count(), 0);

    let expected = triangles
        .iter()
        .fold(Bounds3f::default(), |b, s| b.union(&s.world_bound()));
    assert_eq!(accel.world_bound(), expected);
}

#[test]
fn hit_resolves_point_and_primitive() {
    // one triangle per unit cell along x so that every ray hits exactly one
    let mut p = Vec::new();
    let n = 16;
    for i in 0..n {
        let x = (2 * i) as Float;
        p.extend_from_slice(&[x, 0.0, 0.0, x + 1.0, 0.0, 0.0, x, 1.0, 0.0]);
    }
    let indices: Vec<i32> = (0..3 * n).collect();
    let mut params = ParamSet::new();
    params.add_ints("indices", &indices);
    params.add_floats("point P", &p);
    let shapes = create_shapes("trianglemesh", false, &params).unwrap();
    let prims = to_prims(&shapes);
    let accel = build(&prims, NonTrianglePolicy::Error);

    for i in 0..n as usize {
        let target = Point3f::new((2 * i) as Float + 0.25, 0.25, 0.0);
        let r = Ray::new(
            &(target + Vector3f::new(0.0, 0.0, 3.0)),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
            0.0,
        );
        let si = accel.intersect(&r).unwrap();
        assert!((si.p - target).length() < 1e-4);
        assert!((r.t_max.get() - 3.0).abs() < 1e-4);
        assert!(Arc::ptr_eq(&si.get_primitive().unwrap(), &prims[i]));
        assert!(Arc::ptr_eq(&si.get_shape().unwrap(), &shapes[i]));
        assert_eq!(si.p_error, Vector3f::zero());
        assert!(accel.intersect_p(&Ray::new(
            &(target + Vector3f::new(0.0, 0.0, 3.0)),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
            0.0,
        )));
    }
}

#[test]
fn miss_leaves_ray_untouched() {
    let mut rng = Lcg(11);
    let prims = to_prims(&triangle_soup(&mut rng, 32));
    let accel = build(&prims, NonTrianglePolicy::Fallback);

    let r = Ray::new(
        &Point3f::new(0.0, 0.0, 100.0),
        &Vector3f::new(0.0, 0.0, 1.0),
        Float::INFINITY,
        0.0,
    );
    assert!(accel.intersect(&r).is_none());
    assert_eq!(r.t_max.get(), Float::INFINITY);
    assert!(!accel.intersect_p(&r));

    // hit lies beyond t_max
    let mut p = Vec::new();
    p.extend_from_slice(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    let mut params = ParamSet::new();
    params.add_ints("indices", &[0, 1, 2]);
    params.add_floats("point P", &p);
    let prims = to_prims(&create_shapes("trianglemesh", false, &params).unwrap());
    let accel = build(&prims, NonTrianglePolicy::Fallback);
    let r = Ray::new(
        &Point3f::new(0.2, 0.2, 5.0),
        &Vector3f::new(0.0, 0.0, -1.0),
        4.0,
        0.0,
    );
    assert!(accel.intersect(&r).is_none());
    assert!(!accel.intersect_p(&r));
    assert_eq!(r.t_max.get(), 4.0);
}

#[test]
fn agrees_with_exhaustive_search() {
    let mut rng = Lcg(23);
    let prims = to_prims(&triangle_soup(&mut rng, 200));
    let accel = build(&prims, NonTrianglePolicy::Error);
    let reference = ExhaustiveAccel::new(&prims);

    let mut hits = 0;
    for _ in 0..500 {
        let o = Point3f::new(rng.range(-15.0, 15.0), rng.range(-15.0, 15.0), rng.range(-15.0, 15.0));
        let target = Point3f::new(rng.range(-8.0, 8.0), rng.range(-8.0, 8.0), rng.range(-8.0, 8.0));
        let d = (target - o).normalize();
        let r0 = Ray::new(&o, &d, Float::INFINITY, 0.0);
        let r1 = Ray::new(&o, &d, Float::INFINITY, 0.0);
        let a = accel.intersect(&r0);
        let b = reference.intersect(&r1);
        assert_eq!(a.is_some(), b.is_some());
        if a.is_some() {
            hits += 1;
            assert!((r0.t_max.get() - r1.t_max.get()).abs() < 1e-3);
        }
        assert_eq!(
            accel.intersect_p(&Ray::new(&o, &d, Float::INFINITY, 0.0)),
            a.is_some()
        );
    }
    assert!(hits > 0);
}

#[test]
fn fallback_keeps_non_triangles_visible() {
    let mut params = ParamSet::new();
    params.add_ints("indices", &[0, 1, 2]);
    params.add_floats("point P", &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    let mut shapes = create_shapes("trianglemesh", false, &params).unwrap();
    shapes.push(sphere(&Point3f::new(10.0, 0.0, 0.0), 1.0));
    let prims = to_prims(&shapes);

    let accel = create_accelerator("embree", &prims, &embree_params("fallback")).unwrap();
    let r = Ray::new(
        &Point3f::new(10.0, 0.0, 5.0),
        &Vector3f::new(0.0, 0.0, -1.0),
        Float::INFINITY,
        0.0,
    );
    let si = accel.intersect(&r).unwrap();
    assert!((r.t_max.get() - 4.0).abs() < 1e-4);
    assert!(Arc::ptr_eq(&si.get_primitive().unwrap(), &prims[1]));
    assert!(accel.world_bound().max.x >= 11.0);

    // a nearer triangle in front of the sphere wins
    let r = Ray::new(
        &Point3f::new(0.2, 0.2, 5.0),
        &Vector3f::new(0.0, 0.0, -1.0),
        Float::INFINITY,
        0.0,
    );
    let si = accel.intersect(&r).unwrap();
    assert!(Arc::ptr_eq(&si.get_primitive().unwrap(), &prims[0]));

    let skipped = create_accelerator("embree", &prims, &embree_params("skip")).unwrap();
    let r = Ray::new(
        &Point3f::new(10.0, 0.0, 5.0),
        &Vector3f::new(0.0, 0.0, -1.0),
        Float::INFINITY,
        0.0,
    );
    assert!(skipped.intersect(&r).is_none());

    let e = create_accelerator("embree", &prims, &embree_params("error"))
        .err()
        .unwrap();
    assert!(e.msg.contains("1 of 2"));
}

#[test]
fn accelerator_dispatch() {
    let mut rng = Lcg(3);
    let prims = to_prims(&triangle_soup(&mut rng, 4));
    let e = create_accelerator("bvh", &prims, &ParamSet::new()).err().unwrap();
    assert!(e.is_warning());
    assert!(create_accelerator("embree", &[], &ParamSet::new()).is_err());
    assert!(create_accelerator("exhaustive", &prims, &ParamSet::new()).is_ok());
    let mut params = embree_params("fallback");
    params.add_int("integer maxprimsinnode", 1);
    assert!(create_accelerator("embree", &prims, &params).is_ok());
}

#[test]
fn concurrent_queries_match_serial() {
    let mut rng = Lcg(42);
    let prims = to_prims(&triangle_soup(&mut rng, 128));
    let accel = create_accelerator("embree", &prims, &embree_params("error")).unwrap();

    let rays: Vec<(Point3f, Vector3f)> = (0..1000)
        .map(|_| {
            let o = Point3f::new(rng.range(-15.0, 15.0), rng.range(-15.0, 15.0), 20.0);
            let d = Vector3f::new(rng.range(-0.3, 0.3), rng.range(-0.3, 0.3), -1.0).normalize();
            (o, d)
        })
        .collect();
    let query = |(o, d): &(Point3f, Vector3f)| -> Option<Float> {
        let r = Ray::new(o, d, Float::INFINITY, 0.0);
        accel.intersect(&r).map(|_| r.t_max.get())
    };
    let serial: Vec<Option<Float>> = rays.iter().map(query).collect();
    let parallel: Vec<Option<Float>> = rays.par_iter().map(query).collect();
    assert_eq!(serial, parallel);
}

#[test]
fn degenerate_triangles_are_still_triangles() {
    let p = [
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // valid
        2.0, 0.0, 0.0, 3.0, 0.0, 0.0, 4.0, 0.0, 0.0, // collinear
    ];
    let indices: Vec<i32> = (0..6).collect();
    let mut params = ParamSet::new();
    params.add_ints("integer indices", &indices);
    params.add_floats("point P", &p);
    let shapes = create_shapes("trianglemesh", false, &params).unwrap();
    assert_eq!(shapes.len(), 2);
    assert!(shapes[1].as_triangle().is_some());
    let prims = to_prims(&shapes);

    let accel = build(&prims, NonTrianglePolicy::Error);
    assert_eq!(accel.geometry_count(), 2);
    let accel = build(&prims, NonTrianglePolicy::Skip);
    assert_eq!(accel.geometry_count(), 2);
    assert_eq!(accel.skipped_count(), 0);
    assert_eq!(accel.fallback_count(), 0);

    let r = Ray::new(
        &Point3f::new(0.25, 0.25, 1.0),
        &Vector3f::new(0.0, 0.0, -1.0),
        Float::INFINITY,
        0.0,
    );
    let si = accel.intersect(&r).unwrap();
    assert!(Arc::ptr_eq(&si.get_primitive().unwrap(), &prims[0]));
}

#[test]
fn hit_uv_interpolates_vertex_uvs() {
    let mut params = ParamSet::new();
    params.add_ints("integer indices", &[0, 1, 2]);
    params.add_floats("point P", &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    params.add_floats("float uv", &[0.5, 0.5, 1.0, 0.5, 0.5, 1.0]);
    let shapes = create_shapes("trianglemesh", false, &params).unwrap();
    let prims = to_prims(&shapes);
    let accel = build(&prims, NonTrianglePolicy::Error);

    // barycentrics (0.25, 0.5, 0.25) at this point
    let r = Ray::new(
        &Point3f::new(0.5, 0.25, 2.0),
        &Vector3f::new(0.0, 0.0, -1.0),
        Float::INFINITY,
        0.0,
    );
    let si = accel.intersect(&r).unwrap();
    assert!((si.uv.x - 0.75).abs() < 1e-5, "{:?}", si.uv);
    assert!((si.uv.y - 0.625).abs() < 1e-5, "{:?}", si.uv);
}

use super::intersect::*;
use super::ray::Ray;
use super::vector3::Vector3;
use crate::core::base::*;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Bounds3<T> {
    pub min: Vector3<T>,
    pub max: Vector3<T>,
}

impl<T: Copy> Bounds3<T> {
    pub fn new(min: &Vector3<T>, max: &Vector3<T>) -> Self {
        Bounds3::<T> {
            min: *min,
            max: *max,
        }
    }
}

impl Default for Bounds3f {
    /// An empty box: any union with it yields the other operand.
    fn default() -> Self {
        Bounds3f {
            min: Vector3f::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            max: Vector3f::new(
                Float::NEG_INFINITY,
                Float::NEG_INFINITY,
                Float::NEG_INFINITY,
            ),
        }
    }
}

impl Bounds3f {
    pub fn from_point(p: &Point3f) -> Self {
        Bounds3f { min: *p, max: *p }
    }

    pub fn is_empty(&self) -> bool {
        return self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z;
    }

    pub fn union(&self, other: &Self) -> Self {
        Bounds3f {
            min: Vector3f::min(&self.min, &other.min),
            max: Vector3f::max(&self.max, &other.max),
        }
    }

    pub fn union_p(&self, p: &Point3f) -> Self {
        Bounds3f {
            min: Vector3f::min(&self.min, p),
            max: Vector3f::max(&self.max, p),
        }
    }

    pub fn diagonal(&self) -> Vector3f {
        return self.max - self.min;
    }

    pub fn centroid(&self) -> Point3f {
        return (self.min + self.max) * 0.5;
    }

    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            return 0;
        } else if d.y > d.z {
            return 1;
        } else {
            return 2;
        }
    }

    pub fn inside(&self, p: &Point3f) -> bool {
        return p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z;
    }

    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        return 2.0 * (d.x * d.y + d.x * d.z + d.y * d.z);
    }

    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let t0 = 0.0;
        let t1 = ray.t_max.get();
        let (b, tmin, tmax) = intersect_box(&self.min, &self.max, &ray.o, &ray.d, t0, t1);
        if b {
            return Some((tmin, tmax));
        } else {
            return None;
        }
    }
}

impl<T: Copy> From<((T, T, T), (T, T, T))> for Bounds3<T> {
    fn from(value: ((T, T, T), (T, T, T))) -> Self {
        Bounds3::<T> {
            min: Vector3::<T>::from(value.0),
            max: Vector3::<T>::from(value.1),
        }
    }
}

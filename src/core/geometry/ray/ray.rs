use crate::core::base::*;
use std::cell::Cell;

/// `t_max` is interior-mutable so that a hit can shorten the ray while the
/// aggregate only holds a shared reference to it.
#[derive(Default, Clone, Debug)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    pub t_max: Cell<Float>,
    pub time: Float,
}

impl Ray {
    pub fn new(o: &Point3f, d: &Vector3f, t_max: Float, time: Float) -> Self {
        Ray {
            o: *o,
            d: *d,
            t_max: Cell::new(t_max),
            time,
        }
    }

    pub fn position(&self, t: Float) -> Point3f {
        return self.o + self.d * t;
    }
}

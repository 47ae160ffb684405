use super::numeric_traits::*;
use std::ops;

#[derive(Debug, PartialEq, Default, Copy, Clone)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Vector3::<T> { x, y, z }
    }
}

impl<T: Copy + Default> Vector3<T> {
    #[inline]
    pub fn zero() -> Self {
        Vector3::<T> {
            x: T::default(),
            y: T::default(),
            z: T::default(),
        }
    }
}

impl<T: NumberType> Vector3<T> {
    #[inline]
    pub fn abs(&self) -> Self {
        Vector3::<T> {
            x: NumberType::abs(self.x),
            y: NumberType::abs(self.y),
            z: NumberType::abs(self.z),
        }
    }

    #[inline]
    pub fn min(a: &Self, b: &Self) -> Self {
        Vector3::<T> {
            x: T::min_value(a.x, b.x),
            y: T::min_value(a.y, b.y),
            z: T::min_value(a.z, b.z),
        }
    }

    #[inline]
    pub fn max(a: &Self, b: &Self) -> Self {
        Vector3::<T> {
            x: T::max_value(a.x, b.x),
            y: T::max_value(a.y, b.y),
            z: T::max_value(a.z, b.z),
        }
    }
}

impl<
        T: Copy
            + NumberType
            + FloatType
            + std::ops::Add<Output = T>
            + std::ops::Sub<Output = T>
            + std::ops::Mul<Output = T>
            + std::ops::Div<Output = T>,
    > Vector3<T>
{
    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        return self.x * rhs.x + self.y * rhs.y + self.z * rhs.z;
    }

    #[inline]
    pub fn abs_dot(&self, rhs: &Self) -> T {
        return NumberType::abs(self.dot(rhs));
    }

    #[inline]
    pub fn length_squared(&self) -> T {
        return self.dot(self);
    }

    #[inline]
    pub fn length(&self) -> T {
        return FloatType::sqrt(self.length_squared());
    }

    #[inline]
    pub fn normalize(&self) -> Self {
        let l = self.length();
        Vector3::<T> {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    #[inline]
    pub fn distance_squared(a: &Self, b: &Self) -> T {
        let v = *a - *b;
        return v.dot(&v);
    }

    #[inline]
    pub fn distance(a: &Self, b: &Self) -> T {
        return FloatType::sqrt(Self::distance_squared(a, b));
    }

    #[inline]
    pub fn cross(v1: &Self, v2: &Self) -> Self {
        Vector3::<T> {
            x: (v1.y * v2.z) - (v1.z * v2.y),
            y: (v1.z * v2.x) - (v1.x * v2.z),
            z: (v1.x * v2.y) - (v1.y * v2.x),
        }
    }
}

impl<T: std::ops::Add<Output = T>> ops::Add<Vector3<T>> for Vector3<T> {
    type Output = Vector3<T>;
    #[inline]
    fn add(self, rhs: Vector3<T>) -> Vector3<T> {
        return Vector3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        };
    }
}

impl<T: std::ops::Sub<Output = T>> ops::Sub<Vector3<T>> for Vector3<T> {
    type Output = Vector3<T>;
    #[inline]
    fn sub(self, rhs: Vector3<T>) -> Vector3<T> {
        return Vector3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        };
    }
}

impl<T: std::ops::Mul<Output = T> + Copy> ops::Mul<T> for Vector3<T> {
    type Output = Vector3<T>;
    #[inline]
    fn mul(self, rhs: T) -> Vector3<T> {
        return Vector3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        };
    }
}

impl<T: std::ops::Div<Output = T> + Copy> ops::Div<T> for Vector3<T> {
    type Output = Vector3<T>;
    #[inline]
    fn div(self, rhs: T) -> Vector3<T> {
        return Vector3 {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        };
    }
}

impl ops::Mul<Vector3<f32>> for f32 {
    type Output = Vector3<f32>;
    #[inline]
    fn mul(self, rhs: Vector3<f32>) -> Vector3<f32> {
        return rhs * self;
    }
}

impl ops::Mul<Vector3<f64>> for f64 {
    type Output = Vector3<f64>;
    #[inline]
    fn mul(self, rhs: Vector3<f64>) -> Vector3<f64> {
        return rhs * self;
    }
}

impl<T: std::ops::Neg<Output = T>> ops::Neg for Vector3<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        return Vector3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        };
    }
}

impl<T: std::ops::AddAssign<T>> ops::AddAssign for Vector3<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl<T: std::ops::MulAssign<T> + Copy> ops::MulAssign<T> for Vector3<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl<T> ops::Index<usize> for Vector3<T> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}

impl<T> ops::IndexMut<usize> for Vector3<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl<T: Copy> From<(T, T, T)> for Vector3<T> {
    #[inline]
    fn from(value: (T, T, T)) -> Self {
        Vector3::<T>::new(value.0, value.1, value.2)
    }
}

impl<T: Copy> From<[T; 3]> for Vector3<T> {
    #[inline]
    fn from(value: [T; 3]) -> Self {
        Vector3::<T>::new(value[0], value[1], value[2])
    }
}

//------------------
#[cfg(test)]
mod tests {
    use super::*;

    type Vector3f = Vector3<f32>;

    #[test]
    fn test_001() {
        let v1 = Vector3f::new(1.0, 2.0, 3.0);
        let v2 = Vector3f::new(4.0, 5.0, 6.0);
        assert_eq!(v1 + v2, Vector3f::new(5.0, 7.0, 9.0));
        assert_eq!(v2 - v1, Vector3f::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_002() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(Vector3f::cross(&x, &y), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(Vector3f::dot(&x, &y), 0.0);
    }

    #[test]
    fn test_003() {
        let a = Vector3f::new(1.0, -5.0, 3.0);
        let b = Vector3f::new(-2.0, 4.0, 3.0);
        assert_eq!(Vector3f::min(&a, &b), Vector3f::new(-2.0, -5.0, 3.0));
        assert_eq!(Vector3f::max(&a, &b), Vector3f::new(1.0, 4.0, 3.0));
    }
}

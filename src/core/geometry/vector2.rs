use std::ops;

#[derive(Debug, PartialEq, Default, Copy, Clone)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> Vector2<T> {
    pub fn new(x: T, y: T) -> Self {
        Vector2::<T> { x, y }
    }
}

impl<T: Copy + Default> Vector2<T> {
    #[inline]
    pub fn zero() -> Self {
        Vector2::<T> {
            x: T::default(),
            y: T::default(),
        }
    }
}

impl<T: std::ops::Add<Output = T>> ops::Add for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn add(self, rhs: Vector2<T>) -> Vector2<T> {
        Vector2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: std::ops::Sub<Output = T>> ops::Sub for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn sub(self, rhs: Vector2<T>) -> Vector2<T> {
        Vector2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T: std::ops::Mul<Output = T> + Copy> ops::Mul<T> for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn mul(self, rhs: T) -> Vector2<T> {
        Vector2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl ops::Mul<Vector2<f32>> for f32 {
    type Output = Vector2<f32>;
    #[inline]
    fn mul(self, rhs: Vector2<f32>) -> Vector2<f32> {
        Vector2 {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}

impl<T> ops::Index<usize> for Vector2<T> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            _ => &self.y,
        }
    }
}

impl<T: Copy> From<(T, T)> for Vector2<T> {
    #[inline]
    fn from(value: (T, T)) -> Self {
        Vector2::<T>::new(value.0, value.1)
    }
}

//! Stack-allocated, fixed-dimension vectors, used for the four real
//! components of a spin-1/2 ket.

use std::ops::{ Add, Mul };
use num_traits::Float;

/// A fixed-dimension vector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector<const N: usize, T>(pub [T; N]);

impl<const N: usize, T> Vector<N, T> {
    /// Call a function on each element, returning results in a new vector.
    pub fn map<U, F>(&self, mut f: F) -> Vector<N, U>
    where F: FnMut(&T) -> U
    {
        Vector(std::array::from_fn(|k| f(&self.0[k])))
    }

    /// Combine two vectors element-wise.
    pub fn zip_with<U, V, F>(&self, rhs: &Vector<N, U>, mut f: F) -> Vector<N, V>
    where F: FnMut(&T, &U) -> V
    {
        Vector(std::array::from_fn(|k| f(&self.0[k], &rhs.0[k])))
    }

    /// Unwrap into the underlying array.
    pub fn into_inner(self) -> [T; N] { self.0 }
}

impl<const N: usize, T: Float> Vector<N, T> {
    /// Return the dot product of two vectors.
    pub fn dot(&self, rhs: &Self) -> T {
        self.0.iter().zip(rhs.0.iter())
            .fold(T::zero(), |acc, (l, r)| acc + *l * *r)
    }

    /// Return the squared Euclidean norm.
    pub fn norm_sqr(&self) -> T { self.dot(self) }
}

impl<const N: usize, T> From<[T; N]> for Vector<N, T> {
    fn from(data: [T; N]) -> Self { Self(data) }
}

impl<const N: usize, T: Copy> TryFrom<&[T]> for Vector<N, T> {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[T]) -> Result<Self, Self::Error> {
        let data = <[T; N]>::try_from(slice)?;
        Ok(Self(data))
    }
}

impl<const N: usize, T> Add for Vector<N, T>
where T: Add<Output = T> + Copy
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(&rhs, |l, r| *l + *r)
    }
}

impl<const N: usize, T> Mul<T> for Vector<N, T>
where T: Mul<Output = T> + Copy
{
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output { self.map(|x| *x * rhs) }
}

#[cfg(test)]
mod test {
    use super::Vector;

    #[test]
    fn arithmetic() {
        let u: Vector<4, f64> = Vector([1.0, 2.0, 3.0, 4.0]);
        let v: Vector<4, f64> = Vector::from([1.0; 4]);
        assert_eq!(u + v, Vector([2.0, 3.0, 4.0, 5.0]));
        assert_eq!(u * 2.0, Vector([2.0, 4.0, 6.0, 8.0]));
        assert_eq!(u.map(|x| x * x).into_inner(), [1.0, 4.0, 9.0, 16.0]);
        assert_eq!(u.dot(&v), 10.0);
        assert_eq!(u.norm_sqr(), 30.0);
    }

    #[test]
    fn rk_style_combination() {
        let u: Vector<2, f64> = Vector([1.0, -1.0]);
        let k: Vector<2, f64> = Vector([0.5, 0.25]);
        assert_eq!(u + k * 2.0, Vector([2.0, -0.5]));
    }

    #[test]
    fn slice_conversion() {
        let good: &[f64] = &[1.0, 0.0, 0.0, 0.0];
        let bad: &[f64] = &[1.0, 0.0, 0.0];
        assert!(Vector::<4, f64>::try_from(good).is_ok());
        assert!(Vector::<4, f64>::try_from(bad).is_err());
    }
}

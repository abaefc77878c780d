use std::ops::{AddAssign, MulAssign};

/// Element-wise addition of two slices.
#[inline]
pub(crate) fn add_slice<T: Copy + AddAssign>(lhs: &mut [T], rhs: &[T]) {
    lhs.iter_mut().zip(rhs).for_each(|(l, r)| *l += *r);
}

/// Multiply a scalar to a slice.
#[inline]
pub(crate) fn mul_slice_scalar<T: Copy + MulAssign>(slice: &mut [T], scalar: T) {
    slice.iter_mut().for_each(|l| *l *= scalar);
}

/// Element-wise maximum of two slices, written into `lhs`.
#[inline]
pub(crate) fn max_slice(lhs: &mut [f64], rhs: &[f64]) {
    lhs.iter_mut().zip(rhs).for_each(|(l, r)| *l = l.max(*r));
}

/// Returns the "row" slice of a slice representing a two dimensional matrix.
#[inline]
pub(crate) fn row<T>(slice: &[T], index: usize, row_size: usize) -> &[T] {
    &slice[index * row_size..(index + 1) * row_size]
}

/// Returns the mutable "row" slice of a slice representing a two dimensional matrix.
#[inline]
pub(crate) fn row_mut<T>(slice: &mut [T], index: usize, row_size: usize) -> &mut [T] {
    &mut slice[index * row_size..(index + 1) * row_size]
}

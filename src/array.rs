// euler2d - a 2D compressible Euler equations solver
// Copyright (C) 2026 Euler2D contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Contiguous, row-major N-D array (`rank` 1..=5), the single numerical
//! container used throughout this crate.
//!
//! This is a direct generalisation of `original_source/src/array.hh`'s
//! `Array<T>` template to Rust: same contiguous-`Vec` backing, same
//! row-major index formula, same reference-attachment idea (reimagined here
//! as [`TileView`] because Rust has no aliased-pointer member like
//! `Array::data`).

pub const MAX_ARRAY_RANK: usize = 5;

/// A contiguous, row-major, rank 1..=5 array of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDimArray {
    data: Vec<f64>,
    shape: [usize; MAX_ARRAY_RANK],
    rank: usize,
    strides: [usize; MAX_ARRAY_RANK],
}

fn strides_for(shape: &[usize; MAX_ARRAY_RANK], rank: usize) -> [usize; MAX_ARRAY_RANK] {
    let mut strides = [1usize; MAX_ARRAY_RANK];
    for i in (0..rank.saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

impl MultiDimArray {
    /// Construct a new, owning, zero-filled array with the given shape.
    /// `shape.len()` must be in `1..=MAX_ARRAY_RANK`.
    pub fn new(shape: &[usize]) -> Self {
        let rank = shape.len();
        assert!(
            rank >= 1 && rank <= MAX_ARRAY_RANK,
            "MultiDimArray rank must be in 1..={MAX_ARRAY_RANK}, got {rank}"
        );
        let mut full_shape = [1usize; MAX_ARRAY_RANK];
        full_shape[..rank].copy_from_slice(shape);
        let len = full_shape[..rank].iter().product();
        Self {
            data: vec![0.0; len],
            shape: full_shape,
            rank,
            strides: strides_for(&full_shape, rank),
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The array's extent along each axis, `0..rank()`.
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.rank]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn byte_count(&self) -> usize {
        self.data.len() * std::mem::size_of::<f64>()
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline(always)]
    fn linear_index(&self, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.rank);
        idx.iter()
            .zip(self.strides[..self.rank].iter())
            .map(|(i, s)| i * s)
            .sum()
    }

    /// Element access by `rank()` indices.
    pub fn get(&self, idx: &[usize]) -> f64 {
        self.data[self.linear_index(idx)]
    }

    pub fn get_mut(&mut self, idx: &[usize]) -> &mut f64 {
        let i = self.linear_index(idx);
        &mut self.data[i]
    }

    /// Copies the contents of `other` into `self`. Both arrays must have the
    /// same linear length (shape need not match, matching the reference's
    /// unchecked `memcpy`-by-byte-count semantics, made safe here by an
    /// explicit length check).
    pub fn copy_data_from(&mut self, other: &MultiDimArray) -> crate::error::Result<()> {
        if self.data.len() != other.data.len() {
            return Err(crate::error::Error::ShapeMismatch(format!(
                "copy_data_from: {} elements into {} elements",
                other.data.len(),
                self.data.len()
            )));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Build a raw, non-owning [`TileView`] over this array's whole backing
    /// storage. See [`TileView`] for the safety contract.
    pub fn tile_view(&mut self) -> TileView {
        TileView {
            ptr: self.data.as_mut_ptr(),
            shape: self.shape,
            rank: self.rank,
            strides: self.strides,
        }
    }
}

macro_rules! impl_index {
    ($n:expr, ($($i:ident),+)) => {
        impl std::ops::Index<($(replace_ty!($i)),+,)> for MultiDimArray {
            type Output = f64;
            #[inline(always)]
            fn index(&self, ($($i),+,): ($(replace_ty!($i)),+,)) -> &f64 {
                let idx = [$($i),+];
                &self.data[self.linear_index(&idx)]
            }
        }
        impl std::ops::IndexMut<($(replace_ty!($i)),+,)> for MultiDimArray {
            #[inline(always)]
            fn index_mut(&mut self, ($($i),+,): ($(replace_ty!($i)),+,)) -> &mut f64 {
                let idx = [$($i),+];
                let lin = self.linear_index(&idx);
                &mut self.data[lin]
            }
        }
    };
}

macro_rules! replace_ty {
    ($i:ident) => {
        usize
    };
}

impl_index!(1, (i0));
impl_index!(2, (i0, i1));
impl_index!(3, (i0, i1, i2));
impl_index!(4, (i0, i1, i2, i3));
impl_index!(5, (i0, i1, i2, i3, i4));

/// A raw, non-owning handle into the backing storage of a [`MultiDimArray`],
/// used to hand out axis-0 tile ranges to worker threads.
///
/// # Safety
///
/// `TileView` stores a raw pointer instead of a borrow because the owning
/// [`MultiDimArray`] is conceptually sliced into `T` views — one per worker
/// thread — that must all be usable for the lifetime of a simulation step,
/// which the borrow checker cannot express (it cannot see that the cell
/// ranges any two [`crate::worker::TileGeometry`] values write to never
/// overlap). The actual disjointness is established once, at startup, by
/// [`crate::worker::TileGeometry::partition`] and must never be violated by
/// new call sites: within one pipeline phase, a worker may only *write*
/// through its own `TileView` inside its own geometry's write range, though
/// it may freely *read* any cell (including ones owned by another tile),
/// because by the time a phase runs, all writes from the previous phase are
/// already complete (enforced by [`crate::barrier::Barrier`]).
///
/// A `TileView` must not outlive the [`MultiDimArray`] it was built from.
pub struct TileView {
    ptr: *mut f64,
    shape: [usize; MAX_ARRAY_RANK],
    rank: usize,
    strides: [usize; MAX_ARRAY_RANK],
}

// Safety: see the `TileView` doc comment. Disjointness of concurrent writers
// is a program invariant maintained by `TileGeometry`, not something the
// type system can check here.
unsafe impl Send for TileView {}
unsafe impl Sync for TileView {}

impl TileView {
    pub fn shape(&self) -> &[usize] {
        &self.shape[..self.rank]
    }

    #[inline(always)]
    fn linear_index(&self, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.rank);
        idx.iter()
            .zip(self.strides[..self.rank].iter())
            .map(|(i, s)| i * s)
            .sum()
    }

    /// Read a single element. Safe as long as `idx` is in-bounds for the
    /// owning array's shape, which callers establish via
    /// [`crate::worker::TileGeometry`].
    #[inline(always)]
    pub fn get(&self, idx: &[usize]) -> f64 {
        let i = self.linear_index(idx);
        unsafe { *self.ptr.add(i) }
    }

    /// Write a single element. Caller must ensure `idx` falls within the
    /// calling tile's own write range (see the struct-level safety note).
    #[inline(always)]
    pub fn set(&self, idx: &[usize], value: f64) {
        let i = self.linear_index(idx);
        unsafe { *self.ptr.add(i) = value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let mut a = MultiDimArray::new(&[2, 3]);
        let mut v = 0.0;
        for i in 0..2 {
            for j in 0..3 {
                a[(i, j)] = v;
                v += 1.0;
            }
        }
        assert_eq!(a.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a[(1, 2)], 5.0);
    }

    #[test]
    fn rank3_matches_manual_stride() {
        let mut a = MultiDimArray::new(&[2, 4, 5]);
        a[(1, 2, 3)] = 42.0;
        let expected_index = (1 * 4 + 2) * 5 + 3;
        assert_eq!(a.as_slice()[expected_index], 42.0);
    }

    #[test]
    fn copy_data_from_requires_equal_length() {
        let a = MultiDimArray::new(&[2, 3]);
        let mut b = MultiDimArray::new(&[3, 2]);
        assert!(b.copy_data_from(&a).is_ok());
        let mut c = MultiDimArray::new(&[2, 2]);
        assert!(c.copy_data_from(&a).is_err());
    }

    #[test]
    fn tile_view_aliases_backing_storage() {
        let mut a = MultiDimArray::new(&[4]);
        {
            let view = a.tile_view();
            view.set(&[2], 7.0);
        }
        assert_eq!(a[(2,)], 7.0);
    }
}

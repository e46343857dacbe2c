use rayon::prelude::*;
use std::fmt::Debug;

/// Dense size x size matrix stored row-major in one allocation
///
/// Row-major storage lets the all-pairs solver hand whole rows to parallel
/// workers with [`par_rows_mut`](Self::par_rows_mut).
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix<T>
where
    T: Copy + Debug,
{
    size: usize,
    values: Vec<T>,
}

impl<T> SquareMatrix<T>
where
    T: Copy + Debug,
{
    /// Creates a matrix with every cell set to `value`
    pub fn filled(size: usize, value: T) -> Self {
        SquareMatrix {
            size,
            values: vec![value; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell value, or `None` if either index is out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.values[x * self.size + y])
    }

    /// Sets a cell; returns false if either index is out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.values[x * self.size + y] = value;
        true
    }

    pub fn row(&self, x: usize) -> &[T] {
        &self.values[x * self.size..(x + 1) * self.size]
    }

    /// Copies column `y` out into a new vector
    pub fn column(&self, y: usize) -> Vec<T> {
        (0..self.size).map(|x| self.values[x * self.size + y]).collect()
    }

    /// Mutable row slices for parallel workers, in row order
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, T>
    where
        T: Send,
    {
        // chunk size must be non-zero; an empty matrix has no rows anyway
        self.values.par_chunks_mut(self.size.max(1))
    }
}


//! The orthonormal cosine transform basis,
//! and the forward and inverse two-dimensional block transforms built on it.
//!
//! The forward transform of a block `B` is `M · B · Mᵗ`,
//! the inverse transform of coefficients `C` is `Mᵗ · C · M`.
//! As the matrix is orthonormal, its transpose is its inverse,
//! so no separate inverse matrix is ever constructed.

use smallvec::SmallVec;
use crate::block::{Block, BLOCK_SIZE, BLOCK_SAMPLE_COUNT};
use crate::error::{Error, Result};


/// An `N×N` matrix whose rows are the sampled cosine basis functions.
/// Built once and then only read, so a single matrix can be shared by all threads.
/// The coefficients are stored row-major. An 8×8 matrix is stored without heap allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformMatrix {
    size: usize,
    coefficients: SmallVec<[f32; BLOCK_SAMPLE_COUNT]>,
}

impl TransformMatrix {

    /// Build the transform basis for blocks of `size × size` samples.
    /// The entry in row `k` and column `n` is `c(k) · cos((2n + 1) · k · π / 2N)`,
    /// where `c(0) = sqrt(1/N)` and `c(k) = sqrt(2/N)` otherwise.
    /// Returns an error for the size zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::configuration("transform size must be at least one"));
        }

        Ok(Self::build(size))
    }

    /// The transform basis for the fixed block size of 8.
    pub fn for_blocks() -> Self {
        Self::build(BLOCK_SIZE)
    }

    /// The size must not be zero.
    fn build(size: usize) -> Self {
        let n = size as f64;
        let mut coefficients = SmallVec::with_capacity(size * size);

        for row in 0 .. size {
            let scale = if row == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };

            for column in 0 .. size {
                let angle = (2 * column + 1) as f64 * row as f64 * std::f64::consts::PI / (2.0 * n);
                coefficients.push((scale * angle.cos()) as f32);
            }
        }

        TransformMatrix { size, coefficients }
    }

    /// The number of rows and columns of this matrix.
    pub fn size(&self) -> usize { self.size }

    /// All coefficients, row after row.
    pub fn coefficients(&self) -> &[f32] { &self.coefficients }

    /// The entry in the specified row and column.
    /// Panics for indices outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f32 {
        debug_assert!(row < self.size && column < self.size, "matrix index out of bounds");
        self.coefficients[row * self.size + column]
    }

    /// Create a new matrix with rows and columns swapped.
    /// This is the inverse of this matrix.
    pub fn transposed(&self) -> Self {
        let size = self.size;
        let coefficients = (0 .. size * size)
            .map(|index| self.get(index % size, index / size))
            .collect();

        TransformMatrix { size, coefficients }
    }

    /// Compute `self · other` for two matrices of equal size.
    pub fn multiply(&self, other: &TransformMatrix) -> Result<SmallVec<[f32; BLOCK_SAMPLE_COUNT]>> {
        if other.size != self.size {
            return Err(Error::shape("matrices of different sizes cannot be multiplied"));
        }

        let size = self.size;
        Ok((0 .. size * size).map(|index| {
            let (row, column) = (index / size, index % size);
            (0 .. size).map(|k| self.get(row, k) * other.get(k, column)).sum::<f32>()
        }).collect())
    }

    /// Check that `M · Mᵗ` and `Mᵗ · M` both are the identity matrix,
    /// allowing each entry to deviate by the tolerance.
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let transposed = self.transposed();

        let is_identity = |product: Result<SmallVec<[f32; BLOCK_SAMPLE_COUNT]>>| match product {
            Err(_) => false,
            Ok(product) => product.iter().enumerate().all(|(index, &value)| {
                let expected = if index / self.size == index % self.size { 1.0 } else { 0.0 };
                (value - expected).abs() <= tolerance
            }),
        };

        is_identity(self.multiply(&transposed)) && is_identity(transposed.multiply(self))
    }

    /// Project the spatial samples of a block onto the cosine basis, computing `M · B · Mᵗ`.
    /// Returns an error if this matrix is not of the block size.
    pub fn forward(&self, block: &Block) -> Result<Block> {
        self.validate_block_size()?;
        Ok(self.forward_unchecked(block))
    }

    /// Reconstruct the spatial samples from the basis coefficients, computing `Mᵗ · C · M`.
    /// Returns an error if this matrix is not of the block size.
    pub fn inverse(&self, coefficients: &Block) -> Result<Block> {
        self.validate_block_size()?;
        Ok(self.inverse_unchecked(coefficients))
    }

    /// Returns an error if this matrix cannot transform blocks of the fixed block size.
    pub(crate) fn validate_block_size(&self) -> Result<()> {
        if self.size == BLOCK_SIZE { Ok(()) }
        else { Err(Error::configuration("transform matrix size must equal the block size of 8")) }
    }

    /// Computes `M · B · Mᵗ`. The matrix must be of the block size.
    pub(crate) fn forward_unchecked(&self, block: &Block) -> Block {
        debug_assert_eq!(self.size, BLOCK_SIZE, "transform matrix size bug");

        // rows of the basis applied to the columns of the block
        let mut left = [0.0_f32; BLOCK_SAMPLE_COUNT];
        for k in 0 .. BLOCK_SIZE {
            for x in 0 .. BLOCK_SIZE {
                left[k * BLOCK_SIZE + x] = (0 .. BLOCK_SIZE)
                    .map(|y| self.get(k, y) * block[y * BLOCK_SIZE + x])
                    .sum();
            }
        }

        let mut coefficients = [0.0_f32; BLOCK_SAMPLE_COUNT];
        for k in 0 .. BLOCK_SIZE {
            for l in 0 .. BLOCK_SIZE {
                coefficients[k * BLOCK_SIZE + l] = (0 .. BLOCK_SIZE)
                    .map(|x| left[k * BLOCK_SIZE + x] * self.get(l, x))
                    .sum();
            }
        }

        coefficients
    }

    /// Computes `Mᵗ · C · M`. The matrix must be of the block size.
    pub(crate) fn inverse_unchecked(&self, coefficients: &Block) -> Block {
        debug_assert_eq!(self.size, BLOCK_SIZE, "transform matrix size bug");

        let mut left = [0.0_f32; BLOCK_SAMPLE_COUNT];
        for y in 0 .. BLOCK_SIZE {
            for l in 0 .. BLOCK_SIZE {
                left[y * BLOCK_SIZE + l] = (0 .. BLOCK_SIZE)
                    .map(|k| self.get(k, y) * coefficients[k * BLOCK_SIZE + l])
                    .sum();
            }
        }

        let mut samples = [0.0_f32; BLOCK_SAMPLE_COUNT];
        for y in 0 .. BLOCK_SIZE {
            for x in 0 .. BLOCK_SIZE {
                samples[y * BLOCK_SIZE + x] = (0 .. BLOCK_SIZE)
                    .map(|l| left[y * BLOCK_SIZE + l] * self.get(l, x))
                    .sum();
            }
        }

        samples
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use rand::random;

    #[test]
    fn orthonormal_for_all_small_sizes() {
        for size in 1 ..= 16 {
            let matrix = TransformMatrix::new(size).unwrap();
            assert!(matrix.is_orthonormal(1e-5), "matrix of size {} is not orthonormal", size);
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(TransformMatrix::new(0), Err(Error::Configuration(_))));
    }

    #[test]
    fn first_row_is_constant() {
        let matrix = TransformMatrix::for_blocks();
        let expected = (1.0_f32 / 8.0).sqrt();

        for column in 0 .. BLOCK_SIZE {
            assert!((matrix.get(0, column) - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn known_entries() {
        let matrix = TransformMatrix::for_blocks();

        // c(1) · cos(π / 16)
        let expected = 0.5 * (std::f32::consts::PI / 16.0).cos();
        assert!((matrix.get(1, 0) - expected).abs() < 1e-6);

        // c(2) · cos(3 · 2 · π / 16)
        let expected = 0.5 * (6.0 * std::f32::consts::PI / 16.0).cos();
        assert!((matrix.get(2, 1) - expected).abs() < 1e-6);
    }

    #[test]
    fn transposed_twice_is_identity() {
        let matrix = TransformMatrix::new(5).unwrap();
        assert_eq!(matrix.transposed().transposed(), matrix);
        assert_eq!(matrix.transposed().get(1, 3), matrix.get(3, 1));
    }

    #[test]
    fn multiply_rejects_size_mismatch() {
        let a = TransformMatrix::new(4).unwrap();
        let b = TransformMatrix::new(8).unwrap();
        assert!(a.multiply(&b).is_err());
    }

    #[test]
    fn block_transform_requires_block_size() {
        let matrix = TransformMatrix::new(4).unwrap();
        let block = [0.0; BLOCK_SAMPLE_COUNT];
        assert!(matches!(matrix.forward(&block), Err(Error::Configuration(_))));
        assert!(matches!(matrix.inverse(&block), Err(Error::Configuration(_))));
    }

    #[test]
    fn round_trip_noise() {
        let matrix = TransformMatrix::for_blocks();

        for _ in 0 .. 16 {
            let mut block = [0.0_f32; BLOCK_SAMPLE_COUNT];
            block.iter_mut().for_each(|sample| *sample = 255.0 * random::<f32>() - 128.0);

            let coefficients = matrix.forward(&block).unwrap();
            let reconstructed = matrix.inverse(&coefficients).unwrap();

            for (index, (&expected, &actual)) in block.iter().zip(reconstructed.iter()).enumerate() {
                assert!((expected - actual).abs() < 1e-2, "sample {}: expected {}, found {}", index, expected, actual);
            }
        }
    }

    #[test]
    fn constant_block_has_only_dc() {
        let matrix = TransformMatrix::for_blocks();
        let coefficients = matrix.forward(&[10.0; BLOCK_SAMPLE_COUNT]).unwrap();

        // the orthonormal dc coefficient of a constant block is `value · N`
        assert!((coefficients[0] - 80.0).abs() < 1e-3);
        assert!(coefficients[1..].iter().all(|&ac| ac.abs() < 1e-4));
    }

    #[test]
    fn dc_only_coefficients_give_constant_samples() {
        let matrix = TransformMatrix::for_blocks();

        let mut coefficients = [0.0_f32; BLOCK_SAMPLE_COUNT];
        coefficients[0] = 48.0;

        let samples = matrix.inverse(&coefficients).unwrap();
        assert!(samples.iter().all(|&sample| (sample - 6.0).abs() < 1e-5), "{:?}", samples);
    }
}

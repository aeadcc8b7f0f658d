
//! The lossy round trip of a single block:
//! forward transform, quantize, dequantize, inverse transform.

use crate::block::Block;
use crate::transform::TransformMatrix;
use crate::quantization::{QuantizationTable, Rounding};
use crate::error::Result;


/// Applies the lossy round trip to individual blocks.
/// Holds no mutable state, so one codec can be used from many threads at once,
/// and every block is processed independently of all other blocks.
#[derive(Debug, Clone, Copy)]
pub struct BlockCodec<'m> {
    transform: &'m TransformMatrix,
    rounding: Rounding,
}

impl<'m> BlockCodec<'m> {

    /// Returns a configuration error if the matrix is not of the block size.
    pub fn new(transform: &'m TransformMatrix, rounding: Rounding) -> Result<Self> {
        transform.validate_block_size()?;
        Ok(BlockCodec { transform, rounding })
    }

    /// The rounding used for quantization.
    pub fn rounding(&self) -> Rounding { self.rounding }

    /// Compute the coefficients `M · B · Mᵗ`.
    pub fn forward(&self, block: &Block) -> Block {
        self.transform.forward_unchecked(block)
    }

    /// Compute the samples `Mᵗ · C · M`.
    pub fn inverse(&self, coefficients: &Block) -> Block {
        self.transform.inverse_unchecked(coefficients)
    }

    /// Transform, quantize, dequantize, and transform back.
    /// The result is a pure function of the block, the matrix, the table and the rounding.
    /// Fails only if a quantized coefficient leaves the representable range.
    pub fn encode_decode(&self, block: &Block, table: &QuantizationTable) -> Result<Block> {
        let coefficients = self.forward(block);
        let levels = table.quantize(&coefficients, self.rounding)?;
        let dequantized = table.dequantize(&levels);
        Ok(self.inverse(&dequantized))
    }
}


//! Split channels into 8×8 blocks, and merge processed blocks back into channels.
//!
//! If the width or height of a channel is not divisible by 8,
//! the channel is padded by repeating the rightmost column and the bottom row,
//! so that no artificial edge is introduced at the border.
//! Blocks are ordered row-major by block position: top to bottom, left to right.

use crate::channel::Channel;
use crate::math::Vec2;
use crate::error::{Error, Result};


/// The width and height of a block. Fixed for all channels.
pub const BLOCK_SIZE: usize = 8;

/// The number of samples in a block.
pub const BLOCK_SAMPLE_COUNT: usize = BLOCK_SIZE * BLOCK_SIZE;

/// The samples or coefficients of an 8×8 block, row after row.
pub type Block = [f32; BLOCK_SAMPLE_COUNT];


/// A channel that has been split into blocks.
/// Remembers the size before padding, so that the padding can be removed exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedChannel {

    /// All blocks, top to bottom, left to right.
    pub blocks: Vec<Block>,

    /// The size of the channel before padding.
    pub original_size: Vec2<usize>,

    /// The size of the channel after padding, a multiple of the block size.
    pub padded_size: Vec2<usize>,
}


/// The smallest multiples of the block size that are at least the specified size.
pub fn padded_size(size: Vec2<usize>) -> Vec2<usize> {
    size.next_multiple_of(BLOCK_SIZE)
}

/// The number of blocks in each dimension of a channel of the specified padded size.
pub fn block_count(padded_size: Vec2<usize>) -> Vec2<usize> {
    padded_size.div_ceil(BLOCK_SIZE)
}

/// Copy the channel into blocks, padding its edges by replication.
pub fn partition(channel: &Channel) -> PartitionedChannel {
    let original_size = channel.size();
    let padded_size = padded_size(original_size);
    let block_count = block_count(padded_size);

    let mut blocks = Vec::with_capacity(block_count.area());

    for block_y in 0 .. block_count.height() {
        for block_x in 0 .. block_count.width() {
            let mut block = [0.0_f32; BLOCK_SAMPLE_COUNT];

            for (y, block_row) in block.chunks_exact_mut(BLOCK_SIZE).enumerate() {
                let source_y = (block_y * BLOCK_SIZE + y).min(original_size.height() - 1);
                let source_row = channel.row(source_y);

                for (x, sample) in block_row.iter_mut().enumerate() {
                    let source_x = (block_x * BLOCK_SIZE + x).min(original_size.width() - 1);
                    *sample = source_row[source_x];
                }
            }

            blocks.push(block);
        }
    }

    PartitionedChannel { blocks, original_size, padded_size }
}

/// Place the blocks back into a channel of the padded size,
/// then crop the channel to the original size.
/// The blocks must be ordered as produced by `partition`.
pub fn merge(blocks: &[Block], padded_size: Vec2<usize>, original_size: Vec2<usize>) -> Result<Channel> {
    validate_padded_size(blocks, padded_size)?;

    if original_size.is_empty() || !original_size.fits_into(padded_size) {
        return Err(Error::shape(format!(
            "original size {}x{} does not fit into padded size {}x{}",
            original_size.width(), original_size.height(),
            padded_size.width(), padded_size.height(),
        )));
    }

    let blocks_per_row = block_count(padded_size).width();

    Channel::from_fn(original_size, |position| {
        let block_index = (position.y() / BLOCK_SIZE) * blocks_per_row + position.x() / BLOCK_SIZE;
        let sample_index = (position.y() % BLOCK_SIZE) * BLOCK_SIZE + position.x() % BLOCK_SIZE;
        blocks[block_index][sample_index]
    })
}

/// Recompute the original size from the padded size alone,
/// computing `padded - ((N - padded mod N) mod N)` in each dimension.
///
/// The padded size is always a multiple of `N`, so this formula always
/// returns the padded size itself: it cannot distinguish a channel that
/// needed no padding from a channel that was padded, and never removes any padding.
/// Use `merge` with the original size where the padding must be removed.
pub fn recover_original_size(padded_size: Vec2<usize>) -> Vec2<usize> {
    padded_size.map(|padded| padded - ((BLOCK_SIZE - padded % BLOCK_SIZE) % BLOCK_SIZE))
}

/// Merge the blocks, recomputing the original size from the padded size.
/// See `recover_original_size` for why the result keeps the padding.
pub fn merge_recovering_size(blocks: &[Block], padded_size: Vec2<usize>) -> Result<Channel> {
    merge(blocks, padded_size, recover_original_size(padded_size))
}

fn validate_padded_size(blocks: &[Block], padded_size: Vec2<usize>) -> Result<()> {
    if padded_size.is_empty() || padded_size.width() % BLOCK_SIZE != 0 || padded_size.height() % BLOCK_SIZE != 0 {
        return Err(Error::shape(format!(
            "padded size {}x{} is not a non-zero multiple of the block size",
            padded_size.width(), padded_size.height()
        )));
    }

    let expected_count = block_count(padded_size).area();
    if blocks.len() != expected_count {
        return Err(Error::shape(format!(
            "padded size {}x{} requires {} blocks, but there are {}",
            padded_size.width(), padded_size.height(), expected_count, blocks.len()
        )));
    }

    Ok(())
}

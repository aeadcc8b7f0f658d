
//! Process whole channels and images:
//! remove the bias, split into blocks, run the lossy round trip on every block,
//! merge the blocks, and restore the bias.
//!
//! Blocks share no mutable state, so with the `rayon` feature they are processed
//! in parallel and gathered in their original order before merging.
//! The three planes of an image are processed concurrently as well.

use tracing::debug;

use crate::block::{self, Block};
use crate::channel::Channel;
use crate::codec::BlockCodec;
use crate::color::YCbCrPlanes;
use crate::math::Vec2;
use crate::quantization::{ChannelClass, QuantizationTable, QuantizationTables, Rounding};
use crate::transform::TransformMatrix;
use crate::error::{Error, Result, UnitResult};


/// The value subtracted from every sample before the transform,
/// centering the nominal sample range `0 ..= 255` around zero.
pub const DEFAULT_BIAS: f32 = 128.0;


/// Configures how channels are processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOptions {

    /// Subtracted before and added back after the block round trip.
    pub bias: f32,

    /// How quantized coefficients are rounded.
    pub rounding: Rounding,

    /// Whether to process blocks and planes on multiple threads.
    /// Has no effect without the `rayon` feature.
    /// Parallel and sequential processing produce identical results.
    pub parallel: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            bias: DEFAULT_BIAS,
            rounding: Rounding::default(),
            parallel: cfg!(feature = "rayon"),
        }
    }
}

impl ProcessOptions {

    /// Use a custom bias.
    pub fn with_bias(self, bias: f32) -> Self {
        ProcessOptions { bias, ..self }
    }

    /// Use a custom rounding policy.
    pub fn with_rounding(self, rounding: Rounding) -> Self {
        ProcessOptions { rounding, ..self }
    }

    /// Process everything on the current thread.
    pub fn sequential(self) -> Self {
        ProcessOptions { parallel: false, ..self }
    }

    /// Process blocks and planes in parallel, if the `rayon` feature is enabled.
    pub fn parallel(self) -> Self {
        ProcessOptions { parallel: true, ..self }
    }

    /// Returns a configuration error for a bias that is not finite.
    pub fn validate(&self) -> UnitResult {
        if self.bias.is_finite() { Ok(()) }
        else { Err(Error::configuration("bias must be finite")) }
    }
}


/// Runs the lossy round trip on whole channels,
/// using a shared transform matrix and a quantization table per call.
#[derive(Debug, Clone, Copy)]
pub struct ChannelProcessor<'m> {
    codec: BlockCodec<'m>,
    options: ProcessOptions,
}

impl<'m> ChannelProcessor<'m> {

    /// Returns a configuration error if the matrix is not of the block size
    /// or the options are invalid.
    pub fn new(transform: &'m TransformMatrix, options: ProcessOptions) -> Result<Self> {
        options.validate()?;
        let codec = BlockCodec::new(transform, options.rounding)?;
        Ok(ChannelProcessor { codec, options })
    }

    /// Process a channel, returning a channel of the same size.
    /// Samples of the result may be outside `0 ..= 255`, they are never clamped here.
    /// Fails as a whole if any block fails.
    pub fn process(&self, channel: &Channel, table: &QuantizationTable) -> Result<Channel> {
        let bias = self.options.bias;
        let centered = channel.clone().map(|sample| sample - bias);

        let partitioned = block::partition(&centered);
        let blocks = self.encode_decode_blocks(&partitioned.blocks, table)?;
        let merged = block::merge(&blocks, partitioned.padded_size, partitioned.original_size)?;

        debug!(
            width = partitioned.original_size.width(),
            height = partitioned.original_size.height(),
            padded_width = partitioned.padded_size.width(),
            padded_height = partitioned.padded_size.height(),
            blocks = blocks.len(),
            "processed channel"
        );

        Ok(merged.map(|sample| sample + bias))
    }

    fn encode_decode_blocks(&self, blocks: &[Block], table: &QuantizationTable) -> Result<Vec<Block>> {
        let encode_decode = |block: &Block| self.codec.encode_decode(block, table);

        if self.options.parallel { parallel::map_blocks(blocks, encode_decode) }
        else { blocks.iter().map(encode_decode).collect() }
    }
}


/// Everything needed to process images: the transform matrix and both quantization tables.
/// Construct once, then share by reference. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LossyRoundTrip {
    transform: TransformMatrix,
    tables: QuantizationTables,
    options: ProcessOptions,
}

impl LossyRoundTrip {

    /// Build the transform matrix and validate the options.
    pub fn new(tables: QuantizationTables, options: ProcessOptions) -> Result<Self> {
        options.validate()?;

        debug!(
            bias = options.bias,
            rounding = ?options.rounding,
            parallel = options.parallel,
            "created lossy round trip"
        );

        Ok(LossyRoundTrip { transform: TransformMatrix::for_blocks(), tables, options })
    }

    /// The standard tables with the default options.
    pub fn standard() -> Self {
        LossyRoundTrip {
            transform: TransformMatrix::for_blocks(),
            tables: QuantizationTables::standard(),
            options: ProcessOptions::default(),
        }
    }

    /// The shared transform matrix.
    pub fn transform(&self) -> &TransformMatrix { &self.transform }

    /// The luma and chroma tables.
    pub fn tables(&self) -> &QuantizationTables { &self.tables }

    /// The options used for every channel.
    pub fn options(&self) -> ProcessOptions { self.options }

    /// A processor borrowing the transform matrix of this round trip.
    pub fn channel_processor(&self) -> Result<ChannelProcessor<'_>> {
        ChannelProcessor::new(&self.transform, self.options)
    }

    /// Process a single channel with the table of its class.
    pub fn process_channel(&self, channel: &Channel, class: ChannelClass) -> Result<Channel> {
        self.channel_processor()?.process(channel, self.tables.get(class))
    }

    /// Process all three planes: the luma table for `y`, the chroma table for `cb` and `cr`.
    pub fn process_planes(&self, planes: &YCbCrPlanes) -> Result<YCbCrPlanes> {
        let processor = self.channel_processor()?;
        let luma = &self.tables.luma;
        let chroma = &self.tables.chroma;

        let process = |channel: &Channel, table: &QuantizationTable| processor.process(channel, table);

        let (y, (cb, cr)) = if self.options.parallel {
            parallel::join(
                || process(&planes.y, luma),
                || parallel::join(|| process(&planes.cb, chroma), || process(&planes.cr, chroma)),
            )
        }
        else {
            (process(&planes.y, luma), (process(&planes.cb, chroma), process(&planes.cr, chroma)))
        };

        YCbCrPlanes::new(y?, cb?, cr?)
    }

    /// Convert interleaved 8-bit RGB pixels to planes, process them,
    /// and convert back to clamped 8-bit RGB pixels.
    pub fn process_rgb(&self, size: Vec2<usize>, rgb: &[u8]) -> Result<Vec<u8>> {
        let planes = YCbCrPlanes::from_rgb(size, rgb)?;
        Ok(self.process_planes(&planes)?.to_rgb())
    }
}

impl Default for LossyRoundTrip {
    fn default() -> Self { Self::standard() }
}


/// Fork-join helpers that fall back to the current thread without the `rayon` feature.
mod parallel {
    use crate::block::Block;
    use crate::error::Result;

    /// Map all blocks in parallel, keeping their order.
    /// Stops at the first error.
    #[cfg(feature = "rayon")]
    pub fn map_blocks(blocks: &[Block], map: impl Fn(&Block) -> Result<Block> + Sync + Send) -> Result<Vec<Block>> {
        use rayon::prelude::*;
        blocks.par_iter().map(map).collect()
    }

    #[cfg(not(feature = "rayon"))]
    pub fn map_blocks(blocks: &[Block], map: impl Fn(&Block) -> Result<Block>) -> Result<Vec<Block>> {
        blocks.iter().map(map).collect()
    }

    /// Run both closures, potentially at the same time.
    #[cfg(feature = "rayon")]
    pub fn join<A, B>(a: impl FnOnce() -> A + Send, b: impl FnOnce() -> B + Send) -> (A, B)
        where A: Send, B: Send
    {
        rayon::join(a, b)
    }

    #[cfg(not(feature = "rayon"))]
    pub fn join<A, B>(a: impl FnOnce() -> A, b: impl FnOnce() -> B) -> (A, B) {
        (a(), b())
    }
}

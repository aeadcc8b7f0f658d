
//! Simulate the lossy core of block-transform image compression.
//!
//! Each channel of an image is split into 8×8 blocks, every block is transformed
//! with an orthonormal cosine basis, quantized and dequantized against a standard table,
//! and transformed back. The reconstructed channel shows the characteristic artifacts
//! of transform coding, without producing any bitstream.
//!
//! Start with `LossyRoundTrip::standard()`, then process single channels or whole images.

#![forbid(unsafe_code)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,

    missing_debug_implementations,

    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    redundant_semicolons
)]

#![warn(missing_docs)]

pub mod math;
pub mod error;
pub mod transform;
pub mod quantization;
pub mod channel;
pub mod block;
pub mod codec;
pub mod process;
pub mod color;


/// Export the most important items from `lossy_dct`.
/// _Note: This includes a type called `Result`, possibly overwriting the default `std::Result` type usage._
pub mod prelude {

    // main exports
    pub use crate::process::{LossyRoundTrip, ChannelProcessor, ProcessOptions, DEFAULT_BIAS};

    // core data types
    pub use crate::channel::Channel;
    pub use crate::color::YCbCrPlanes;
    pub use crate::quantization::{QuantizationTable, QuantizationTables, ChannelClass, Rounding};
    pub use crate::transform::TransformMatrix;
    pub use crate::codec::BlockCodec;
    pub use crate::block::{Block, BLOCK_SIZE, BLOCK_SAMPLE_COUNT};

    // secondary data types
    pub use crate::math::Vec2;
    pub use crate::error::{Error, Result};
}

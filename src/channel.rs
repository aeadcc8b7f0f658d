
//! A single color component plane.

use crate::math::Vec2;
use crate::error::{Error, Result};


/// A two-dimensional plane of real-valued samples, stored row after row.
/// Samples are nominally in `0 ..= 255`, but may leave that range
/// after a lossy round trip. A channel is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    size: Vec2<usize>,
    samples: Vec<f32>,
}

impl Channel {

    /// Wrap the row-major samples of a plane with the specified width and height.
    /// Returns a shape error if the size is empty or does not match the sample count.
    pub fn new(size: Vec2<usize>, samples: Vec<f32>) -> Result<Self> {
        if size.is_empty() {
            return Err(Error::shape(format!("channel size {}x{} is empty", size.width(), size.height())));
        }

        if size.area() != samples.len() {
            return Err(Error::shape(format!(
                "channel of size {}x{} requires {} samples, but has {}",
                size.width(), size.height(), size.area(), samples.len()
            )));
        }

        Ok(Channel { size, samples })
    }

    /// Compute each sample from its position.
    pub fn from_fn(size: Vec2<usize>, sample: impl Fn(Vec2<usize>) -> f32) -> Result<Self> {
        let samples = (0 .. size.area())
            .map(|index| sample(Vec2(index % size.width().max(1), index / size.width().max(1))))
            .collect();

        Self::new(size, samples)
    }

    /// A channel where all samples have the same value.
    pub fn filled(size: Vec2<usize>, value: f32) -> Result<Self> {
        Self::new(size, vec![value; size.area()])
    }

    /// The width and height of this channel.
    pub fn size(&self) -> Vec2<usize> { self.size }

    /// All samples, row after row.
    pub fn samples(&self) -> &[f32] { &self.samples }

    /// The sample at the specified position. Panics for positions outside the channel.
    #[inline]
    pub fn get(&self, position: Vec2<usize>) -> f32 {
        debug_assert!(position.x() < self.size.width() && position.y() < self.size.height(), "sample position out of bounds");
        self.samples[position.y() * self.size.width() + position.x()]
    }

    /// All samples of one row.
    pub fn row(&self, y: usize) -> &[f32] {
        let width = self.size.width();
        &self.samples[y * width .. (y + 1) * width]
    }

    /// Apply a function to every sample, keeping the size.
    pub fn map(mut self, sample: impl Fn(f32) -> f32) -> Self {
        self.samples.iter_mut().for_each(|value| *value = sample(*value));
        self
    }
}


//! Error type definitions.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};


/// A result that may contain a round trip error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains a round trip error.
pub type UnitResult = Result<()>;


/// An error that may happen while simulating the lossy round trip.
/// Every error is reported at the first violation,
/// and no partially processed channel is ever returned.
#[derive(Debug)]
pub enum Error {

    /// The configuration cannot be used,
    /// for example a quantization table with a zero entry.
    /// Detected when constructing the configuration,
    /// before any block is processed.
    Configuration(Cow<'static, str>),

    /// The channel dimensions or sample buffers do not match,
    /// or a channel is empty.
    Shape(Cow<'static, str>),

    /// A quantized coefficient is not finite or does not fit into an `i32`.
    NumericRange(Cow<'static, str>),
}


impl Error {

    /// Create an error of the variant `Configuration`.
    pub(crate) fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Configuration(message.into())
    }

    /// Create an error of the variant `Shape`.
    pub(crate) fn shape(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Shape(message.into())
    }

    /// Create an error of the variant `NumericRange`.
    pub(crate) fn numeric_range(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NumericRange(message.into())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(message) => write!(formatter, "invalid configuration: {}", message),
            Error::Shape(message) => write!(formatter, "invalid channel shape: {}", message),
            Error::NumericRange(message) => write!(formatter, "coefficient out of range: {}", message),
        }
    }
}

impl std::error::Error for Error {}


/// Return error on infinite or NaN values.
pub(crate) fn f32_to_finite(value: f32, error_message: &'static str) -> Result<f32> {
    if value.is_finite() { Ok(value) }
    else { Err(Error::numeric_range(error_message)) }
}

/// Return error on values that an `i32` cannot hold.
/// The value is expected to already be integral.
pub(crate) fn f32_to_i32(value: f32, error_message: &'static str) -> Result<i32> {
    // i32::MAX is not representable as f32, the closest value above is 2^31
    const UPPER_EXCLUSIVE: f32 = 2_147_483_648.0;
    const LOWER_INCLUSIVE: f32 = -2_147_483_648.0;

    let value = f32_to_finite(value, error_message)?;
    if value >= LOWER_INCLUSIVE && value < UPPER_EXCLUSIVE { Ok(value as i32) }
    else { Err(Error::numeric_range(error_message)) }
}

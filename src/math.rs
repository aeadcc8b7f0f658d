
//! Simple math utilities.


/// Simple two-dimensional vector of any numerical type.
/// Used mainly as a size (width and height) or a position (x and y).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2<T> (pub T, pub T);

impl<T> Vec2<T> {

    /// Maps all components of this vector to a new type, yielding a vector of that new type.
    pub fn map<B>(self, map: impl Fn(T) -> B) -> Vec2<B> {
        Vec2(map(self.0), map(self.1))
    }

    /// Seeing this vector as a dimension or size (width and height),
    /// this returns the area that this dimensions contains (`width * height`).
    #[inline] pub fn area(self) -> T where T: std::ops::Mul<T, Output = T> {
        self.0 * self.1
    }

    /// The first component of this 2D vector.
    #[inline] pub fn x(self) -> T { self.0 }

    /// The second component of this 2D vector.
    #[inline] pub fn y(self) -> T { self.1 }

    /// The first component of this 2D vector.
    #[inline] pub fn width(self) -> T { self.0 }

    /// The second component of this 2D vector.
    #[inline] pub fn height(self) -> T { self.1 }
}

impl Vec2<usize> {

    /// Whether either the width or the height is zero.
    pub fn is_empty(self) -> bool {
        self.0 == 0 || self.1 == 0
    }

    /// Whether this size fits into the other size, in both dimensions.
    pub fn fits_into(self, other: Vec2<usize>) -> bool {
        self.0 <= other.0 && self.1 <= other.1
    }

    /// Round both dimensions up to the next multiple of the step.
    pub(crate) fn next_multiple_of(self, step: usize) -> Vec2<usize> {
        self.map(|dimension| dimension.next_multiple_of(step))
    }

    /// How many steps are needed to cover each dimension, counting partial steps.
    pub(crate) fn div_ceil(self, step: usize) -> Vec2<usize> {
        self.map(|dimension| dimension.div_ceil(step))
    }
}

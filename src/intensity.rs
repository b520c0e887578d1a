// MIT/Apache2 License

use crate::util::{clamp, normalize};
use ordered_float::NotNan;

/// A value that goes from zero to one, used for color channels and for the acceleration priority of a
/// surface. This type is essentially a wrapper around an `f32`, but with two invariants:
///
/// * The inner value will always be between `0.0` and `1.0`.
/// * The inner value will never be `NaN`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Intensity {
    inner: NotNan<f32>,
}

impl Intensity {
    /// Zero intensity.
    pub const ZERO: Intensity = unsafe { Intensity::new_unchecked(0.0) };
    /// Full intensity.
    pub const ONE: Intensity = unsafe { Intensity::new_unchecked(1.0) };

    /// Create a new `Intensity`, without checking the inner value.
    ///
    /// # Safety
    ///
    /// Behavior is undefined if `inner` is not a number, or outside of the range [0, 1].
    #[inline]
    pub const unsafe fn new_unchecked(inner: f32) -> Self {
        Self {
            inner: NotNan::unchecked_new(inner),
        }
    }

    /// Create a new `Intensity`. If the inner value does not meet the invariants mentioned above, this function
    /// returns `None`.
    #[inline]
    pub fn new(inner: f32) -> Option<Self> {
        if inner.is_nan() || inner < 0.0 || inner > 1.0 {
            None
        } else {
            Some(Self {
                inner: unsafe { NotNan::unchecked_new(inner) },
            })
        }
    }

    /// Create an `Intensity` from an 8-bit channel value.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        unsafe { Self::new_unchecked(normalize(value)) }
    }

    /// Get the inner value of the `Intensity`.
    #[inline]
    pub fn into_inner(self) -> f32 {
        self.inner.into_inner()
    }

    /// Clamp this value to a `u8`.
    #[inline]
    pub fn clamp_to_u8(self) -> u8 {
        clamp(self.into_inner())
    }
}

impl From<Intensity> for f32 {
    #[inline]
    fn from(i: Intensity) -> f32 {
        i.into_inner()
    }
}

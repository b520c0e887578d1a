// MIT/Apache2 License

use num_traits::{Bounded, NumCast};

/// Scale a value in the range [0, 1] up to the full range of an integer type.
#[inline]
pub(crate) fn clamp<T: Bounded + NumCast>(value: f32) -> T {
    let max: f32 = NumCast::from(T::max_value()).unwrap_or(f32::MAX);
    let scaled = (value.max(0.0).min(1.0) * max).round();
    NumCast::from(scaled).unwrap_or_else(T::max_value)
}

/// Scale an integer value in its full range down to [0, 1].
#[inline]
pub(crate) fn normalize<T: Bounded + NumCast>(value: T) -> f32 {
    let max: f32 = NumCast::from(T::max_value()).unwrap_or(f32::MAX);
    let value: f32 = NumCast::from(value).unwrap_or(0.0);
    value / max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp::<u8>(0.0), 0);
        assert_eq!(clamp::<u8>(1.0), 255);
        assert_eq!(clamp::<u8>(2.0), 255);
        assert_eq!(clamp::<u16>(0.5), 32768);
        assert_eq!(normalize(255u8), 1.0);
    }
}

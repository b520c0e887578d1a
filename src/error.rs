// MIT/Apache2 License

use std::{fmt, path::PathBuf};

/// Sum error type for slate operations.
#[derive(Debug)]
pub enum Error {
    /// A static string message.
    StaticMsg(&'static str),
    /// A string message, usually reported by a `Toolkit` implementation.
    Toolkit(String),
    /// A surface was requested with a zero dimension, or with more pixels than can be addressed.
    InvalidDimensions { width: u32, height: u32 },
    /// A pixel buffer did not match the dimensions it was paired with.
    BufferLength { expected: usize, actual: usize },
    /// An image file could not be read or decoded.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// The toolkit reported a mirror status we do not know how to recover from.
    IrreparableMirror(i32),
    /// A pixel coordinate lies outside of the surface.
    OutOfBounds { x: u32, y: u32 },
    /// The surface's pixel buffer has already been released.
    Destroyed,
    /// A drawing operation needs a device mirror, but none is live.
    NoMirror,
    /// A shape could not be broken down into triangles.
    Tessellation(String),
}

impl std::error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticMsg(s) => f.write_str(s),
            Self::Toolkit(s) => write!(f, "Toolkit error: {}", s),
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid surface dimensions {}x{}", width, height)
            }
            Self::BufferLength { expected, actual } => write!(
                f,
                "Pixel buffer holds {} elements, expected {}",
                actual, expected
            ),
            Self::Decode { path, source } => {
                write!(f, "Failed to decode {}: {}", path.display(), source)
            }
            Self::IrreparableMirror(code) => write!(
                f,
                "Device mirror is in an irreparable state (status {})",
                code
            ),
            Self::OutOfBounds { x, y } => write!(f, "Pixel ({}, {}) is out of bounds", x, y),
            Self::Destroyed => f.write_str("Surface has already been destroyed"),
            Self::NoMirror => f.write_str("Surface has no live device mirror"),
            Self::Tessellation(s) => write!(f, "Failed to tessellate shape: {}", s),
        }
    }
}

/// Convenience result type.
pub type Result<T = ()> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::InvalidDimensions {
            width: 0,
            height: 4,
        };
        assert_eq!(e.to_string(), "Invalid surface dimensions 0x4");

        let e = Error::IrreparableMirror(7);
        assert_eq!(
            e.to_string(),
            "Device mirror is in an irreparable state (status 7)"
        );
    }
}

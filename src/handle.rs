// MIT/Apache2 License

use std::num::NonZeroUsize;

/// Represents an image that lives in device memory.
///
/// In general, there are two types of images: those that exist in client memory, and those that exist on the
/// graphics device. Client-side images are ones that the program itself has direct access to; in this crate,
/// that is the [`PixelSurface`]. Device-side images are owned by the [`Toolkit`], which may place them in video
/// memory and may take that memory away again at any time.
///
/// The `DeviceImage` struct itself is just a thin wrapper around the [`NonZeroUsize`] structure, since it
/// really is either just an ID or a pointer underneath it all. Thus, there is no automatic management or
/// cleanup of the `DeviceImage`'s resources; call [`Toolkit::flush_image`] once it is no longer needed.
///
/// [`PixelSurface`]: crate::PixelSurface
/// [`Toolkit`]: crate::Toolkit
/// [`Toolkit::flush_image`]: crate::Toolkit::flush_image
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DeviceImage {
    inner: NonZeroUsize,
}

impl DeviceImage {
    /// Create a new `DeviceImage` from a `NonZeroUsize` identifying a device-side image.
    #[inline]
    pub fn from_raw(raw: NonZeroUsize) -> DeviceImage {
        DeviceImage { inner: raw }
    }

    /// Get the `NonZeroUsize` backing this `DeviceImage`.
    #[inline]
    pub fn into_raw(self) -> NonZeroUsize {
        self.inner
    }
}

/// A drawing context targeting some device-side image or window.
///
/// Like [`DeviceImage`], this is only a handle. It must be released through
/// [`Toolkit::release_context`] before the image it draws onto is flushed.
///
/// [`Toolkit::release_context`]: crate::Toolkit::release_context
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DrawingContext {
    inner: NonZeroUsize,
}

impl DrawingContext {
    /// Create a new `DrawingContext` from a raw identifier.
    #[inline]
    pub fn from_raw(raw: NonZeroUsize) -> DrawingContext {
        DrawingContext { inner: raw }
    }

    /// Get the raw identifier backing this `DrawingContext`.
    #[inline]
    pub fn into_raw(self) -> NonZeroUsize {
        self.inner
    }
}

/// The layout of the packed `u32` values in a pixel buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelFormat {
    /// `0x00RRGGBB`. The top byte is ignored when the pixels are drawn.
    Rgb,
    /// `0xAARRGGBB`.
    Argb,
}

impl PixelFormat {
    /// Pick the format for a surface with or without an alpha channel.
    #[inline]
    pub fn with_alpha(has_alpha: bool) -> Self {
        if has_alpha {
            PixelFormat::Argb
        } else {
            PixelFormat::Rgb
        }
    }

    /// Does this `PixelFormat` carry transparency?
    #[inline]
    pub fn is_transparent(self) -> bool {
        matches!(self, PixelFormat::Argb)
    }
}

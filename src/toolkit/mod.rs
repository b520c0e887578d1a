// MIT/Apache2 License

use crate::{Color, DeviceImage, DrawingContext, Intensity, PixelFormat, Shape, ShapeStyle};

mod headless;

pub use headless::{HeadlessStats, HeadlessToolkit};

/// The graphics toolkit backing device-side images.
///
/// In real-world applications, images rarely act alone. There is some kind of central node tying all
/// of them together: a connection to the display server, a Direct3D device, an OpenGL context. The
/// `Toolkit` trait aims to be an abstraction over these, covering only the primitives that an
/// [`AcceleratedSurface`] needs in order to keep a mirror of its pixels in device memory.
///
/// The toolkit is passed into every call that touches the device, rather than being read from a
/// global. The display configuration is queried through it each time a mirror is validated, since the
/// display mode may change at any moment.
///
/// Release operations (`release_context` and `flush_image`) are infallible. Releasing a handle twice
/// is not required to be safe.
///
/// [`AcceleratedSurface`]: crate::AcceleratedSurface
pub trait Toolkit {
    /// Get the configuration of the default display, as it is right now.
    fn display_configuration(&mut self) -> crate::Result<DisplayConfig>;

    /// Allocate a device image compatible with `config`.
    ///
    /// `priority` is a hint for how important it is that the image lives in accelerated memory.
    /// Toolkits are free to ignore it.
    fn create_device_image(
        &mut self,
        config: &DisplayConfig,
        width: u32,
        height: u32,
        priority: Intensity,
    ) -> crate::Result<DeviceImage>;

    /// Create a drawing context targeting a device image.
    fn create_drawing_context(&mut self, image: DeviceImage) -> crate::Result<DrawingContext>;

    /// Copy a client-side pixel buffer onto the origin of the drawing context's target.
    fn upload_pixels(
        &mut self,
        context: DrawingContext,
        pixels: &[u32],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> crate::Result;

    /// Check whether a device image is still usable with `config`.
    fn validate(&mut self, image: DeviceImage, config: &DisplayConfig) -> MirrorStatus;

    /// Draw a device image onto the target of `target`, with its origin at `(x, y)`.
    fn blit(&mut self, target: DrawingContext, source: DeviceImage, x: i32, y: i32)
        -> crate::Result;

    /// Set the color used for subsequent shape drawing.
    fn set_color(&mut self, context: DrawingContext, color: Color) -> crate::Result;

    /// Draw a shape with the context's current color.
    fn draw_shape(
        &mut self,
        context: DrawingContext,
        shape: &Shape,
        style: ShapeStyle,
    ) -> crate::Result;

    /// Release a drawing context.
    fn release_context(&mut self, context: DrawingContext);

    /// Free the device memory held by an image.
    fn flush_image(&mut self, image: DeviceImage);
}

/// A snapshot of the default display's configuration.
///
/// Device images are only compatible with the configuration they were created for. When the display mode
/// changes, the toolkit hands out a configuration with a new `id`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisplayConfig {
    /// Identifies this configuration; equal ids imply compatible configurations.
    pub id: u64,
    /// Width of the display, in pixels.
    pub width: u32,
    /// Height of the display, in pixels.
    pub height: u32,
}

/// The state of a device image, as reported by [`Toolkit::validate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MirrorStatus {
    /// The image is intact and compatible with the display.
    Ok,
    /// The image's memory was reclaimed and reallocated. It is usable, but its contents are undefined.
    Restored,
    /// The image cannot be used with the current display configuration.
    Incompatible,
    /// Any other status. There is no known way to recover from this.
    Other(i32),
}

impl<T: Toolkit + ?Sized> Toolkit for &mut T {
    #[inline]
    fn display_configuration(&mut self) -> crate::Result<DisplayConfig> {
        (**self).display_configuration()
    }
    #[inline]
    fn create_device_image(
        &mut self,
        config: &DisplayConfig,
        width: u32,
        height: u32,
        priority: Intensity,
    ) -> crate::Result<DeviceImage> {
        (**self).create_device_image(config, width, height, priority)
    }
    #[inline]
    fn create_drawing_context(&mut self, image: DeviceImage) -> crate::Result<DrawingContext> {
        (**self).create_drawing_context(image)
    }
    #[inline]
    fn upload_pixels(
        &mut self,
        context: DrawingContext,
        pixels: &[u32],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> crate::Result {
        (**self).upload_pixels(context, pixels, width, height, format)
    }
    #[inline]
    fn validate(&mut self, image: DeviceImage, config: &DisplayConfig) -> MirrorStatus {
        (**self).validate(image, config)
    }
    #[inline]
    fn blit(
        &mut self,
        target: DrawingContext,
        source: DeviceImage,
        x: i32,
        y: i32,
    ) -> crate::Result {
        (**self).blit(target, source, x, y)
    }
    #[inline]
    fn set_color(&mut self, context: DrawingContext, color: Color) -> crate::Result {
        (**self).set_color(context, color)
    }
    #[inline]
    fn draw_shape(
        &mut self,
        context: DrawingContext,
        shape: &Shape,
        style: ShapeStyle,
    ) -> crate::Result {
        (**self).draw_shape(context, shape, style)
    }
    #[inline]
    fn release_context(&mut self, context: DrawingContext) {
        (**self).release_context(context)
    }
    #[inline]
    fn flush_image(&mut self, image: DeviceImage) {
        (**self).flush_image(image)
    }
}

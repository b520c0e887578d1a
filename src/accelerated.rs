// MIT/Apache2 License

//! A pixel surface mirrored into device memory.

use crate::{
    Canvas, Color, DeviceImage, DrawingContext, Error, Intensity, MirrorStatus, PixelSurface, Shape,
    ShapeStyle, Toolkit,
};
use std::{fmt, path::Path};

/// Limits on how hard [`AcceleratedSurface::render`] tries to recover a lost mirror.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RecoveryPolicy {
    /// Number of recoveries (recreations or discards of the mirror) allowed within one `render` call
    /// before it gives up.
    ///
    /// With a bound of zero no recovery is ever made: the first bad status ends the render, and the
    /// mirror is left as the toolkit reported it.
    pub max_attempts: u32,
}

impl Default for RecoveryPolicy {
    #[inline]
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

/// Why a render gave up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FailureCause {
    /// The mirror kept coming back incompatible with the display.
    Incompatibility,
    /// The mirror kept losing its contents.
    DataLoss,
}

impl fmt::Display for FailureCause {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Incompatibility => f.write_str("incompatibility"),
            FailureCause::DataLoss => f.write_str("loss of data"),
        }
    }
}

/// The result of a call to [`AcceleratedSurface::render`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RenderOutcome {
    /// The mirror was blitted onto the target after `attempts` recoveries.
    Rendered { attempts: u32 },
    /// The recovery bound was hit and nothing was drawn.
    Exhausted { attempts: u32, cause: FailureCause },
}

impl RenderOutcome {
    /// Whether the image was drawn.
    #[inline]
    pub fn succeeded(self) -> bool {
        matches!(self, RenderOutcome::Rendered { .. })
    }

    /// Number of recoveries that were performed.
    #[inline]
    pub fn attempts(self) -> u32 {
        match self {
            RenderOutcome::Rendered { attempts } | RenderOutcome::Exhausted { attempts, .. } => {
                attempts
            }
        }
    }

    /// The cause of failure, if the render failed.
    #[inline]
    pub fn failure_cause(self) -> Option<FailureCause> {
        match self {
            RenderOutcome::Rendered { .. } => None,
            RenderOutcome::Exhausted { cause, .. } => Some(cause),
        }
    }
}

#[inline]
fn give_up(attempts: u32, cause: FailureCause) -> RenderOutcome {
    log::warn!(
        "After {} attempts, rendering has failed due to {}.",
        attempts,
        cause
    );
    RenderOutcome::Exhausted { attempts, cause }
}

/// The device-side copy of a surface, along with the context used to draw onto it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Mirror {
    image: DeviceImage,
    context: DrawingContext,
}

impl Mirror {
    /// Release the context first, so it never points at flushed memory.
    #[inline]
    fn release<T: Toolkit + ?Sized>(self, toolkit: &mut T) {
        toolkit.release_context(self.context);
        toolkit.flush_image(self.image);
    }
}

/// A [`PixelSurface`] with a mirror of its contents kept in device memory.
///
/// Drawing the pixel surface onto a window directly means re-uploading its contents every time. An
/// `AcceleratedSurface` instead uploads them once, into a device image created by the [`Toolkit`], and
/// blits that image from then on. The catch is that device memory is not under the program's control: the
/// system may take it away to service another application, or invalidate it because the display mode
/// changed. [`render`] checks the mirror before every blit and recovers it from the pixel surface when
/// necessary.
///
/// Edits to the pixel surface are not automatically reflected in the mirror; call [`accelerate`] to push
/// them to the device.
///
/// [`render`]: AcceleratedSurface::render
/// [`accelerate`]: AcceleratedSurface::accelerate
#[derive(Debug)]
pub struct AcceleratedSurface {
    surface: PixelSurface,
    // invariant: at most one mirror is live at a time
    mirror: Option<Mirror>,
    priority: Intensity,
    policy: RecoveryPolicy,
}

impl AcceleratedSurface {
    /// Create a new surface. No mirror exists until the first render.
    #[inline]
    pub fn new(width: u32, height: u32, has_alpha: bool) -> crate::Result<Self> {
        PixelSurface::new(width, height, has_alpha).map(Self::from_surface)
    }

    /// Wrap an existing pixel surface. No mirror exists until the first render.
    #[inline]
    pub fn from_surface(surface: PixelSurface) -> Self {
        Self {
            surface,
            mirror: None,
            priority: Intensity::ONE,
            policy: RecoveryPolicy::default(),
        }
    }

    /// Decode an image file and immediately mirror it into device memory.
    #[inline]
    pub fn load_from_file<T: Toolkit + ?Sized, P: AsRef<Path>>(
        toolkit: &mut T,
        path: P,
    ) -> crate::Result<Self> {
        let mut this = Self::from_surface(PixelSurface::load_from_file(path)?);
        this.accelerate(toolkit)?;
        Ok(this)
    }

    /// Use a different recovery policy.
    #[inline]
    pub fn with_policy(mut self, policy: RecoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> RecoveryPolicy {
        self.policy
    }

    /// Set how important it is that the mirror lives in accelerated memory. This takes effect the next time
    /// the mirror is created.
    #[inline]
    pub fn set_acceleration_priority(&mut self, priority: Intensity) {
        self.priority = priority;
    }

    #[inline]
    pub fn acceleration_priority(&self) -> Intensity {
        self.priority
    }

    /// Recreate the mirror from the current contents of the pixel surface.
    ///
    /// Any existing mirror is released first. This is fairly expensive, since the whole surface is uploaded
    /// to the device.
    pub fn accelerate<T: Toolkit + ?Sized>(&mut self, toolkit: &mut T) -> crate::Result {
        self.discard_mirror(toolkit);

        let pixels = self.surface.pixels().ok_or(Error::Destroyed)?;
        let (width, height) = self.surface.dimensions();
        let config = toolkit.display_configuration()?;
        let image = toolkit.create_device_image(&config, width, height, self.priority)?;

        let context = match toolkit.create_drawing_context(image) {
            Ok(context) => context,
            Err(e) => {
                toolkit.flush_image(image);
                return Err(e);
            }
        };
        let mirror = Mirror { image, context };

        if let Err(e) = toolkit.upload_pixels(context, pixels, width, height, self.surface.format())
        {
            mirror.release(toolkit);
            return Err(e);
        }

        log::debug!(
            "Created {}x{} mirror {:?} for display config #{}",
            width,
            height,
            image,
            config.id
        );
        self.mirror = Some(mirror);
        Ok(())
    }

    #[inline]
    fn discard_mirror<T: Toolkit + ?Sized>(&mut self, toolkit: &mut T) {
        if let Some(mirror) = self.mirror.take() {
            log::debug!("Discarding mirror {:?}", mirror.image);
            mirror.release(toolkit);
        }
    }

    /// Make one attempt at drawing the mirror onto `target`, with its origin at `(x, y)`.
    ///
    /// The mirror is created if it does not exist, then validated against the current display configuration.
    /// The blit only happens if the status is [`MirrorStatus::Ok`]; otherwise the status is returned and no
    /// recovery is performed. This is the building block of [`render`], for callers that want explicit control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IrreparableMirror`] if the toolkit reports a status other than the three known ones.
    ///
    /// [`render`]: AcceleratedSurface::render
    pub fn attempt_render<T: Toolkit + ?Sized>(
        &mut self,
        toolkit: &mut T,
        target: DrawingContext,
        x: i32,
        y: i32,
    ) -> crate::Result<MirrorStatus> {
        let image = match self.mirror {
            Some(mirror) => mirror.image,
            None => {
                self.accelerate(toolkit)?;
                self.mirror.map(|m| m.image).ok_or(Error::NoMirror)?
            }
        };

        let config = toolkit.display_configuration()?;
        let status = toolkit.validate(image, &config);
        log::trace!("Mirror {:?} validated as {:?}", image, status);

        match status {
            MirrorStatus::Ok => {
                toolkit.blit(target, image, x, y)?;
                Ok(status)
            }
            MirrorStatus::Restored | MirrorStatus::Incompatible => Ok(status),
            MirrorStatus::Other(code) => Err(Error::IrreparableMirror(code)),
        }
    }

    /// Draw the mirror onto `target`, with its origin at `(x, y)`, recovering it as needed.
    ///
    /// When the mirror's contents were lost it is recreated from the pixel surface; when it is incompatible
    /// with the display it is discarded and created anew. Each of these counts as one recovery. Once the
    /// policy's `max_attempts` recoveries have been made without a successful blit, a warning is logged and
    /// [`RenderOutcome::Exhausted`] is returned. Exhaustion is not an error: the next call starts counting from
    /// zero again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IrreparableMirror`] immediately, without retrying, if the toolkit reports an unknown
    /// status. Toolkit failures while creating or blitting the mirror are propagated as well.
    pub fn render<T: Toolkit + ?Sized>(
        &mut self,
        toolkit: &mut T,
        target: DrawingContext,
        x: i32,
        y: i32,
    ) -> crate::Result<RenderOutcome> {
        let mut attempts = 0;

        loop {
            let cause = match self.attempt_render(toolkit, target, x, y)? {
                MirrorStatus::Ok => return Ok(RenderOutcome::Rendered { attempts }),
                MirrorStatus::Restored => FailureCause::DataLoss,
                MirrorStatus::Incompatible => FailureCause::Incompatibility,
                MirrorStatus::Other(code) => return Err(Error::IrreparableMirror(code)),
            };

            // only reachable without a recovery when the bound is zero
            if attempts >= self.policy.max_attempts {
                return Ok(give_up(attempts, cause));
            }

            match cause {
                FailureCause::DataLoss => self.accelerate(toolkit)?,
                FailureCause::Incompatibility => self.discard_mirror(toolkit),
            }

            attempts += 1;
            if attempts >= self.policy.max_attempts {
                return Ok(give_up(attempts, cause));
            }
        }
    }

    #[inline]
    fn mirror_context(&self) -> crate::Result<DrawingContext> {
        self.mirror.map(|m| m.context).ok_or(Error::NoMirror)
    }

    /// Set the color used by [`draw_shape`] on the mirror.
    ///
    /// [`draw_shape`]: AcceleratedSurface::draw_shape
    #[inline]
    pub fn set_draw_color<T: Toolkit + ?Sized>(
        &mut self,
        toolkit: &mut T,
        color: Color,
    ) -> crate::Result {
        toolkit.set_color(self.mirror_context()?, color)
    }

    /// Draw a shape directly onto the mirror.
    ///
    /// This does not touch the pixel surface, so the shape is lost once the mirror is recreated.
    #[inline]
    pub fn draw_shape<T: Toolkit + ?Sized>(
        &mut self,
        toolkit: &mut T,
        shape: &Shape,
        style: ShapeStyle,
    ) -> crate::Result {
        toolkit.draw_shape(self.mirror_context()?, shape, style)
    }

    /// Draw another device image onto the mirror.
    #[inline]
    pub fn draw_image<T: Toolkit + ?Sized>(
        &mut self,
        toolkit: &mut T,
        image: DeviceImage,
        x: i32,
        y: i32,
    ) -> crate::Result {
        toolkit.blit(self.mirror_context()?, image, x, y)
    }

    /// Release the mirror and the pixel surface.
    ///
    /// The drawing context goes first, then the device image, then the pixel buffer.
    #[inline]
    pub fn destroy<T: Toolkit + ?Sized>(&mut self, toolkit: &mut T) {
        self.discard_mirror(toolkit);
        self.surface.destroy();
    }

    /// Whether a mirror currently exists.
    #[inline]
    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// The device image of the current mirror.
    #[inline]
    pub fn mirror_image(&self) -> Option<DeviceImage> {
        self.mirror.map(|m| m.image)
    }

    #[inline]
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut PixelSurface {
        &mut self.surface
    }

    #[inline]
    pub fn into_surface(self) -> PixelSurface {
        self.surface
    }

    /* Delegated to the pixel surface */

    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.surface.has_alpha()
    }

    /// See [`PixelSurface::set_pixel`].
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        self.surface.set_pixel(x, y, color)
    }

    /// See [`PixelSurface::pixel`].
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.surface.pixel(x, y)
    }

    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.surface.clear(color)
    }

    #[inline]
    pub fn pixels(&self) -> Option<&[u32]> {
        self.surface.pixels()
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> Option<&mut [u32]> {
        self.surface.pixels_mut()
    }

    /// See [`PixelSurface::canvas`]. Like any other edit, drawing here reaches the mirror on the next
    /// [`accelerate`].
    ///
    /// [`accelerate`]: AcceleratedSurface::accelerate
    #[inline]
    pub fn canvas(&mut self) -> crate::Result<Canvas<'_>> {
        self.surface.canvas()
    }
}

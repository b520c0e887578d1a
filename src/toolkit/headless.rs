// MIT/Apache2 License

//! A toolkit that keeps its "device" images in client memory.
//!
//! This is useful for running without a display, and for exercising the recovery logic of
//! [`AcceleratedSurface`]: validation results can be scripted, and display mode changes or memory
//! reclamation can be simulated.
//!
//! [`AcceleratedSurface`]: crate::AcceleratedSurface

use super::{DisplayConfig, MirrorStatus, Toolkit};
use crate::{
    raster::{self, Target, Tessellation},
    Color, DeviceImage, DrawingContext, Error, Intensity, PixelFormat, Shape, ShapeStyle,
};
use std::{
    collections::{HashMap, VecDeque},
    num::NonZeroUsize,
};

/// Counters for every device operation a `HeadlessToolkit` has performed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub images_created: usize,
    pub images_flushed: usize,
    pub contexts_created: usize,
    pub contexts_released: usize,
    pub uploads: usize,
    pub validations: usize,
    pub blits: usize,
    pub shapes: usize,
    /// Images that were flushed while a drawing context still targeted them.
    pub flushed_with_live_context: usize,
}

#[derive(Debug)]
struct HeadlessImage {
    width: u32,
    height: u32,
    config_id: u64,
    contents_lost: bool,
    pixels: Vec<u32>,
}

impl HeadlessImage {
    #[inline]
    fn target(&mut self) -> Target<'_> {
        Target {
            pixels: &mut self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug)]
struct HeadlessContext {
    image: DeviceImage,
    color: Color,
}

/// An in-memory implementation of [`Toolkit`].
#[derive(Debug)]
pub struct HeadlessToolkit {
    config: DisplayConfig,
    next_id: usize,
    images: HashMap<DeviceImage, HeadlessImage>,
    contexts: HashMap<DrawingContext, HeadlessContext>,
    script: VecDeque<MirrorStatus>,
    stats: HeadlessStats,
    tessellation: Tessellation,
}

impl Default for HeadlessToolkit {
    #[inline]
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl HeadlessToolkit {
    /// Create a toolkit whose display has the given bounds.
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            config: DisplayConfig {
                id: 1,
                width,
                height,
            },
            next_id: 1,
            images: HashMap::new(),
            contexts: HashMap::new(),
            script: VecDeque::new(),
            stats: HeadlessStats::default(),
            tessellation: Tessellation::default(),
        }
    }

    #[inline]
    fn next_raw(&mut self) -> NonZeroUsize {
        let id = self.next_id;
        self.next_id += 1;
        NonZeroUsize::new(id).unwrap_or(NonZeroUsize::MAX)
    }

    /// Queue validation results. While the queue is non-empty, `validate` reports its entries in order
    /// instead of inspecting the image.
    #[inline]
    pub fn script_validation<I: IntoIterator<Item = MirrorStatus>>(&mut self, statuses: I) {
        self.script.extend(statuses);
    }

    /// Number of scripted validation results that have not been consumed yet.
    #[inline]
    pub fn pending_validations(&self) -> usize {
        self.script.len()
    }

    /// Simulate a display mode change. Every existing image becomes incompatible.
    #[inline]
    pub fn change_display_mode(&mut self, width: u32, height: u32) {
        self.config = DisplayConfig {
            id: self.config.id + 1,
            width,
            height,
        };
        log::debug!(
            "Display mode changed to {}x{} (config #{})",
            width,
            height,
            self.config.id
        );
    }

    /// Simulate the system reclaiming video memory. Every existing image loses its contents.
    #[inline]
    pub fn reclaim_memory(&mut self) {
        for image in self.images.values_mut() {
            image.contents_lost = true;
            image.pixels.iter_mut().for_each(|p| *p = 0);
        }
    }

    /// Create a window-like target that images can be blitted onto.
    #[inline]
    pub fn create_target(&mut self, width: u32, height: u32) -> crate::Result<DrawingContext> {
        let config = self.config;
        let image = self.create_device_image(&config, width, height, Intensity::ONE)?;
        self.create_drawing_context(image)
    }

    /// The pixels of the image a drawing context targets.
    #[inline]
    pub fn target_pixels(&self, context: DrawingContext) -> Option<&[u32]> {
        let ctx = self.contexts.get(&context)?;
        self.images.get(&ctx.image).map(|img| &*img.pixels)
    }

    /// The pixels of a device image.
    #[inline]
    pub fn image_pixels(&self, image: DeviceImage) -> Option<&[u32]> {
        self.images.get(&image).map(|img| &*img.pixels)
    }

    /// The current color of a drawing context.
    #[inline]
    pub fn context_color(&self, context: DrawingContext) -> Option<Color> {
        self.contexts.get(&context).map(|ctx| ctx.color)
    }

    /// Number of images currently allocated.
    #[inline]
    pub fn live_images(&self) -> usize {
        self.images.len()
    }

    /// Number of drawing contexts currently allocated.
    #[inline]
    pub fn live_contexts(&self) -> usize {
        self.contexts.len()
    }

    #[inline]
    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    #[inline]
    fn context_image(&mut self, context: DrawingContext) -> crate::Result<&mut HeadlessImage> {
        let image = self
            .contexts
            .get(&context)
            .ok_or(Error::StaticMsg("Unknown drawing context"))?
            .image;
        self.images
            .get_mut(&image)
            .ok_or(Error::StaticMsg("Drawing context targets a flushed image"))
    }
}

impl Toolkit for HeadlessToolkit {
    #[inline]
    fn display_configuration(&mut self) -> crate::Result<DisplayConfig> {
        Ok(self.config)
    }

    fn create_device_image(
        &mut self,
        config: &DisplayConfig,
        width: u32,
        height: u32,
        priority: Intensity,
    ) -> crate::Result<DeviceImage> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let image = DeviceImage::from_raw(self.next_raw());
        log::trace!(
            "Allocating {}x{} headless image {:?} (priority {})",
            width,
            height,
            image,
            priority.into_inner()
        );

        self.images.insert(
            image,
            HeadlessImage {
                width,
                height,
                config_id: config.id,
                contents_lost: false,
                pixels: vec![0; width as usize * height as usize],
            },
        );
        self.stats.images_created += 1;
        Ok(image)
    }

    #[inline]
    fn create_drawing_context(&mut self, image: DeviceImage) -> crate::Result<DrawingContext> {
        if !self.images.contains_key(&image) {
            return Err(Error::StaticMsg("Unknown device image"));
        }

        let context = DrawingContext::from_raw(self.next_raw());
        self.contexts.insert(
            context,
            HeadlessContext {
                image,
                color: Color::BLACK,
            },
        );
        self.stats.contexts_created += 1;
        Ok(context)
    }

    fn upload_pixels(
        &mut self,
        context: DrawingContext,
        pixels: &[u32],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> crate::Result {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }

        let dst = self.context_image(context)?;
        match format {
            PixelFormat::Argb => {
                raster::copy_clipped(&mut dst.target(), pixels, width, height, 0, 0)
            }
            PixelFormat::Rgb => {
                let opaque: Vec<u32> = pixels
                    .iter()
                    .map(|&p| Color::from_packed(p, false).argb())
                    .collect();
                raster::copy_clipped(&mut dst.target(), &opaque, width, height, 0, 0);
            }
        }

        self.stats.uploads += 1;
        Ok(())
    }

    fn validate(&mut self, image: DeviceImage, config: &DisplayConfig) -> MirrorStatus {
        self.stats.validations += 1;

        if let Some(status) = self.script.pop_front() {
            return status;
        }

        match self.images.get_mut(&image) {
            None => MirrorStatus::Other(-1),
            Some(img) if img.config_id != config.id => MirrorStatus::Incompatible,
            Some(img) if img.contents_lost => {
                img.contents_lost = false;
                MirrorStatus::Restored
            }
            Some(_) => MirrorStatus::Ok,
        }
    }

    fn blit(
        &mut self,
        target: DrawingContext,
        source: DeviceImage,
        x: i32,
        y: i32,
    ) -> crate::Result {
        // the source image may be the target's image, so take a copy first
        let (pixels, width, height) = {
            let src = self
                .images
                .get(&source)
                .ok_or(Error::StaticMsg("Unknown device image"))?;
            (src.pixels.clone(), src.width, src.height)
        };

        let dst = self.context_image(target)?;
        raster::copy_clipped(
            &mut dst.target(),
            &pixels,
            width,
            height,
            i64::from(x),
            i64::from(y),
        );
        self.stats.blits += 1;
        Ok(())
    }

    #[inline]
    fn set_color(&mut self, context: DrawingContext, color: Color) -> crate::Result {
        let ctx = self
            .contexts
            .get_mut(&context)
            .ok_or(Error::StaticMsg("Unknown drawing context"))?;
        ctx.color = color;
        Ok(())
    }

    fn draw_shape(
        &mut self,
        context: DrawingContext,
        shape: &Shape,
        style: ShapeStyle,
    ) -> crate::Result {
        let ctx = self
            .contexts
            .get(&context)
            .ok_or(Error::StaticMsg("Unknown drawing context"))?;
        let image = self
            .images
            .get_mut(&ctx.image)
            .ok_or(Error::StaticMsg("Drawing context targets a flushed image"))?;

        log::trace!("Headless {:?} of {:?} on {:?}", style, shape, context);
        self.tessellation
            .draw_shape(&mut image.target(), shape, style, 1.0, ctx.color.argb())?;
        self.stats.shapes += 1;
        Ok(())
    }

    #[inline]
    fn release_context(&mut self, context: DrawingContext) {
        if self.contexts.remove(&context).is_some() {
            self.stats.contexts_released += 1;
        }
    }

    #[inline]
    fn flush_image(&mut self, image: DeviceImage) {
        if self.images.remove(&image).is_some() {
            self.stats.images_flushed += 1;

            if self.contexts.values().any(|ctx| ctx.image == image) {
                log::warn!("Flushed {:?} while a drawing context still targets it", image);
                self.stats.flushed_with_live_context += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(tk: &mut HeadlessToolkit, w: u32, h: u32) -> DeviceImage {
        let config = tk.display_configuration().unwrap();
        tk.create_device_image(&config, w, h, Intensity::ONE).unwrap()
    }

    #[test]
    fn test_validation_follows_display() {
        let mut tk = HeadlessToolkit::default();
        let img = image(&mut tk, 2, 2);

        let config = tk.display_configuration().unwrap();
        assert_eq!(tk.validate(img, &config), MirrorStatus::Ok);

        tk.reclaim_memory();
        assert_eq!(tk.validate(img, &config), MirrorStatus::Restored);
        assert_eq!(tk.validate(img, &config), MirrorStatus::Ok);

        tk.change_display_mode(800, 600);
        let config = tk.display_configuration().unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(tk.validate(img, &config), MirrorStatus::Incompatible);
    }

    #[test]
    fn test_script_takes_precedence() {
        let mut tk = HeadlessToolkit::default();
        let img = image(&mut tk, 1, 1);
        let config = tk.display_configuration().unwrap();

        tk.script_validation(vec![MirrorStatus::Other(3), MirrorStatus::Restored]);
        assert_eq!(tk.pending_validations(), 2);
        assert_eq!(tk.validate(img, &config), MirrorStatus::Other(3));
        assert_eq!(tk.validate(img, &config), MirrorStatus::Restored);
        assert_eq!(tk.validate(img, &config), MirrorStatus::Ok);
        assert_eq!(tk.stats().validations, 3);
    }

    #[test]
    fn test_upload_and_blit() {
        let mut tk = HeadlessToolkit::default();
        let img = image(&mut tk, 2, 1);
        let ctx = tk.create_drawing_context(img).unwrap();
        tk.upload_pixels(ctx, &[0x11, 0x22], 2, 1, PixelFormat::Rgb)
            .unwrap();
        assert_eq!(tk.image_pixels(img).unwrap(), &[0xFF00_0011, 0xFF00_0022]);

        let target = tk.create_target(3, 2).unwrap();
        tk.blit(target, img, 2, 1).unwrap();
        assert_eq!(
            tk.target_pixels(target).unwrap(),
            &[0, 0, 0, 0, 0, 0xFF00_0011]
        );
    }

    #[test]
    fn test_release() {
        let mut tk = HeadlessToolkit::default();
        let img = image(&mut tk, 1, 1);
        let ctx = tk.create_drawing_context(img).unwrap();
        tk.release_context(ctx);
        tk.flush_image(img);
        assert_eq!(tk.live_images(), 0);
        assert_eq!(tk.live_contexts(), 0);
        assert!(tk.set_color(ctx, Color::WHITE).is_err());
        assert_eq!(tk.stats().flushed_with_live_context, 0);
    }

    #[test]
    fn test_flush_before_release() {
        let mut tk = HeadlessToolkit::default();
        let img = image(&mut tk, 1, 1);
        let ctx = tk.create_drawing_context(img).unwrap();
        tk.flush_image(img);
        assert_eq!(tk.stats().flushed_with_live_context, 1);

        tk.release_context(ctx);
        assert_eq!(tk.live_contexts(), 0);
    }

    #[test]
    fn test_draw_shape_uses_context_color() {
        use lyon_geom::{euclid::Size2D, Point, Rect};

        let mut tk = HeadlessToolkit::default();
        let img = image(&mut tk, 3, 3);
        let ctx = tk.create_drawing_context(img).unwrap();
        tk.set_color(ctx, Color::WHITE).unwrap();

        let rect = Rect::new(Point::new(1.0, 1.0), Size2D::new(2.0, 2.0));
        tk.draw_shape(ctx, &rect.into(), ShapeStyle::Fill).unwrap();

        let w = Color::WHITE.argb();
        assert_eq!(
            tk.image_pixels(img).unwrap(),
            &[0, 0, 0, 0, w, w, 0, w, w]
        );
        assert_eq!(tk.stats().shapes, 1);
    }
}

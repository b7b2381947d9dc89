//! Frame compositing
//!
//! Turns a [`MaskFrame`] into pixels: the union of blob outlines becomes a
//! clip mask and the source image is drawn through it at its fitted
//! rectangle. Geometry stays in logical units until the surface transform
//! multiplies it by the device pixel ratio.

use crate::error::{Result, RevealError};
use crate::mask::MaskFrame;
use ink_core::{Rect, Size};
use ink_image::{fit_rect, ImageData, ObjectFit, ObjectPosition};
use tiny_skia::{
    Color, FillRule, FilterQuality, Mask, Path, PathBuilder, Pixmap, PixmapPaint, Transform,
};

/// Placeholder zoom, hiding the soft edge the blur leaves at the border
pub const PLACEHOLDER_SCALE: f32 = 1.1;

// ============================================================================
// Surface
// ============================================================================

/// The drawing target of one reveal instance.
///
/// Holds a backing pixmap of `floor(logical) * dpr` pixels. The pixmap is
/// only reallocated when that backing size changes.
pub struct Surface {
    logical: Size,
    dpr: f32,
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(logical: Size, dpr: f32) -> Result<Self> {
        let logical = floor_size(logical);
        let dpr = sanitize_dpr(dpr);
        let (width, height) = backing_size(logical, dpr)?;
        let pixmap = Pixmap::new(width, height)
            .ok_or(RevealError::SurfaceUnavailable("backing pixmap allocation failed"))?;

        Ok(Self {
            logical,
            dpr,
            pixmap,
        })
    }

    /// Match a new container size and pixel ratio.
    ///
    /// Returns whether the backing pixmap was reallocated.
    pub fn resize(&mut self, logical: Size, dpr: f32) -> Result<bool> {
        let logical = floor_size(logical);
        let dpr = sanitize_dpr(dpr);
        let (width, height) = backing_size(logical, dpr)?;

        self.logical = logical;
        self.dpr = dpr;

        if width == self.pixmap.width() && height == self.pixmap.height() {
            return Ok(false);
        }

        tracing::debug!(width, height, dpr, "resizing reveal surface");
        self.pixmap = Pixmap::new(width, height)
            .ok_or(RevealError::SurfaceUnavailable("backing pixmap allocation failed"))?;
        Ok(true)
    }

    /// Logical size in DPI-independent units
    pub fn logical(&self) -> Size {
        self.logical
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }

    /// Backing size in device pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Logical to device pixel transform
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.dpr, self.dpr)
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

fn floor_size(size: Size) -> Size {
    Size::new(size.width.floor(), size.height.floor())
}

fn sanitize_dpr(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

fn backing_size(logical: Size, dpr: f32) -> Result<(u32, u32)> {
    if logical.is_empty() {
        return Err(RevealError::SurfaceUnavailable("surface has no size"));
    }
    let width = (logical.width * dpr).floor().max(1.0) as u32;
    let height = (logical.height * dpr).floor().max(1.0) as u32;
    Ok((width, height))
}

// ============================================================================
// Compositor
// ============================================================================

/// Draws the masked source image onto a surface
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Compositor {
    pub fit: ObjectFit,
    pub position: ObjectPosition,
}

impl Compositor {
    pub fn new(fit: ObjectFit, position: ObjectPosition) -> Self {
        Self { fit, position }
    }

    /// Where the image lands in logical frame units
    pub fn draw_rect(&self, image: &ImageData, frame: Size) -> Rect {
        fit_rect(image.natural_size(), frame, self.fit, self.position)
    }

    /// Redraw the surface for one frame.
    ///
    /// The surface is cleared first; pixels outside the mask stay
    /// transparent.
    pub fn draw(&self, surface: &mut Surface, mask: &MaskFrame, image: &ImageData) -> Result<()> {
        surface.clear();

        let Some(path) = mask_path(mask) else {
            return Ok(());
        };

        let (width, height) = surface.backing_size();
        let mut clip =
            Mask::new(width, height).ok_or(RevealError::SurfaceUnavailable("mask allocation failed"))?;
        clip.fill_path(&path, FillRule::Winding, true, surface.transform());

        let rect = self.draw_rect(image, surface.logical());
        let transform = image_transform(image, rect).post_scale(surface.dpr, surface.dpr);

        surface.pixmap_mut().draw_pixmap(
            0,
            0,
            image.pixmap().as_ref(),
            &PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            },
            transform,
            Some(&clip),
        );
        Ok(())
    }
}

/// Combine every blob outline into one path; overlaps union under the
/// nonzero winding rule
fn mask_path(mask: &MaskFrame) -> Option<Path> {
    let mut pb = PathBuilder::new();

    for shape in &mask.shapes {
        let mut points = shape.path.points().iter();
        let Some(first) = points.next() else {
            continue;
        };
        pb.move_to(first.x, first.y);
        for p in points {
            pb.line_to(p.x, p.y);
        }
        pb.close();
    }

    pb.finish()
}

/// Map image pixels onto a logical rectangle
fn image_transform(image: &ImageData, rect: Rect) -> Transform {
    let sx = rect.width() / image.width() as f32;
    let sy = rect.height() / image.height() as f32;
    Transform::from_row(sx, 0.0, 0.0, sy, rect.x(), rect.y())
}

// ============================================================================
// Layer stack
// ============================================================================

/// Flattens the reveal's visual layers into one image.
///
/// Bottom to top: background colour, the blurred placeholder (until the
/// reveal completes), the masked reveal canvas, and the unmasked final
/// image at the cross-fade opacity.
pub struct LayerStack {
    pub background: Color,
    pub placeholder: Option<ImageData>,
    pub compositor: Compositor,
}

impl LayerStack {
    pub fn new(background: Color, compositor: Compositor) -> Self {
        Self {
            background,
            placeholder: None,
            compositor,
        }
    }

    pub fn with_placeholder(mut self, placeholder: ImageData) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Render the layers at the canvas's backing size
    pub fn flatten(
        &self,
        canvas: &Surface,
        image: &ImageData,
        opacity: f32,
        placeholder_visible: bool,
    ) -> Result<Pixmap> {
        let (width, height) = canvas.backing_size();
        let mut out = Pixmap::new(width, height)
            .ok_or(RevealError::SurfaceUnavailable("output allocation failed"))?;
        out.fill(self.background);

        let frame = canvas.logical();
        let dpr = canvas.device_pixel_ratio();
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        if placeholder_visible {
            if let Some(placeholder) = &self.placeholder {
                let rect = self.compositor.draw_rect(placeholder, frame);
                let (cx, cy) = (frame.width / 2.0, frame.height / 2.0);
                let transform = image_transform(placeholder, rect)
                    .post_translate(-cx, -cy)
                    .post_scale(PLACEHOLDER_SCALE, PLACEHOLDER_SCALE)
                    .post_translate(cx, cy)
                    .post_scale(dpr, dpr);
                out.draw_pixmap(0, 0, placeholder.pixmap().as_ref(), &paint, transform, None);
            }
        }

        out.draw_pixmap(
            0,
            0,
            canvas.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        let opacity = opacity.clamp(0.0, 1.0);
        if opacity > 0.0 {
            let rect = self.compositor.draw_rect(image, frame);
            let transform = image_transform(image, rect).post_scale(dpr, dpr);
            out.draw_pixmap(
                0,
                0,
                image.pixmap().as_ref(),
                &PixmapPaint { opacity, ..paint },
                transform,
                None,
            );
        }

        Ok(out)
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    let (r, g, b, a) = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            (expand(0)?, expand(1)?, expand(2)?, 255)
        }
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?, 255),
        8 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}

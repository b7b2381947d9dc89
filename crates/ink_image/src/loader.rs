//! Image decoding into premultiplied pixmaps

use crate::error::{ImageError, Result};
use crate::source::{ImageFormat, ImageSource};
use ink_core::Size;
use image::RgbaImage;
use tiny_skia::{IntSize, Pixmap};

/// A decoded image ready for compositing
///
/// Pixels are stored premultiplied, the layout the rasterizer samples from.
#[derive(Clone, Debug)]
pub struct ImageData {
    pixmap: Pixmap,
}

impl ImageData {
    /// Decode an image from any supported source
    pub fn load(source: ImageSource) -> Result<Self> {
        tracing::debug!(source = %source.describe(), "loading image");

        let rgba = match source {
            ImageSource::File(path) => {
                let bytes = std::fs::read(&path)?;
                let format = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(ImageFormat::from_extension);
                decode(&bytes, format)?
            }
            ImageSource::Bytes { data, format } => decode(&data, format)?,
            ImageSource::Rgba {
                data,
                width,
                height,
            } => RgbaImage::from_raw(width, height, data)
                .ok_or(ImageError::InvalidDimensions { width, height })?,
            ImageSource::Url(url) => return Err(ImageError::UnsupportedSource(url)),
        };

        Self::from_rgba_image(rgba)
    }

    /// Wrap straight-alpha RGBA pixels
    pub fn from_rgba_image(rgba: RgbaImage) -> Result<Self> {
        let (width, height) = rgba.dimensions();
        let size =
            IntSize::from_wh(width, height).ok_or(ImageError::InvalidDimensions { width, height })?;

        let mut data = rgba.into_raw();
        premultiply_alpha(&mut data);

        let pixmap =
            Pixmap::from_vec(data, size).ok_or(ImageError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    /// Wrap an already premultiplied pixmap, such as a rendered frame
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Solid-colour image, handy as a stand-in source
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        Self::from_rgba_image(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Natural size in pixels, as reported by the image-load notification
    pub fn natural_size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Convert back to straight-alpha RGBA
    pub fn to_rgba_image(&self) -> RgbaImage {
        let data = unpremultiply_alpha(self.pixmap.data());
        // Dimensions come from a valid pixmap, so the buffer always matches
        RgbaImage::from_raw(self.width(), self.height(), data)
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }

    /// Gaussian-blurred copy, used for placeholders
    pub fn blurred(&self, sigma: f32) -> Result<Self> {
        if sigma <= 0.0 {
            return Ok(self.clone());
        }
        let blurred = image::imageops::blur(&self.to_rgba_image(), sigma);
        Self::from_rgba_image(blurred)
    }
}

fn decode(bytes: &[u8], format: Option<ImageFormat>) -> Result<RgbaImage> {
    let image = match format {
        Some(format) => image::load_from_memory_with_format(bytes, format.to_image_format())
            .or_else(|_| image::load_from_memory(bytes))?,
        None => image::load_from_memory(bytes)?,
    };
    Ok(image.to_rgba8())
}

fn premultiply_alpha(data: &mut [u8]) {
    for chunk in data.chunks_exact_mut(4) {
        let a = chunk[3] as u16;
        if a < 255 {
            for c in &mut chunk[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }
}

/// Convert premultiplied alpha to straight alpha
fn unpremultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            let r = (chunk[0] as f32 / a).round().min(255.0) as u8;
            let g = (chunk[1] as f32 / a).round().min(255.0) as u8;
            let b = (chunk[2] as f32 / a).round().min(255.0) as u8;
            result.extend_from_slice(&[r, g, b, chunk[3]]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 10, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_png_bytes() {
        let data = ImageData::load(ImageSource::bytes(png_bytes(12, 7))).unwrap();
        assert_eq!(data.natural_size(), Size::new(12.0, 7.0));

        let pixel = data.pixmap().pixel(3, 3).unwrap();
        assert_eq!(
            (pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()),
            (200, 40, 10, 255)
        );
    }

    #[test]
    fn test_load_rgba_checks_dimensions() {
        let err = ImageData::load(ImageSource::rgba(vec![0; 10], 4, 4)).unwrap_err();
        assert!(matches!(err, ImageError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = ImageData::load(ImageSource::bytes(vec![1, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ImageData::load(ImageSource::file("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn test_url_is_unsupported() {
        let err = ImageData::load(ImageSource::from_uri("https://example.com/a.png")).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedSource(_)));
    }

    #[test]
    fn test_premultiply_round_trip() {
        let rgba = RgbaImage::from_pixel(2, 2, image::Rgba([255, 128, 0, 128]));
        let data = ImageData::from_rgba_image(rgba).unwrap();

        let stored = data.pixmap().pixel(0, 0).unwrap();
        assert_eq!(stored.red(), 128);

        let back = data.to_rgba_image();
        let px = back.get_pixel(1, 1);
        assert_eq!(px.0[3], 128);
        assert!((px.0[0] as i32 - 255).abs() <= 1);
    }

    #[test]
    fn test_from_pixmap_keeps_pixels() {
        let mut pixmap = Pixmap::new(3, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        let rgba = ImageData::from_pixmap(pixmap).to_rgba_image();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(2, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_blur_keeps_size() {
        let data = ImageData::solid(16, 9, [10, 20, 30, 255]).unwrap();
        let blurred = data.blurred(4.0).unwrap();
        assert_eq!(blurred.natural_size(), data.natural_size());
        assert!(ImageData::solid(0, 9, [0, 0, 0, 0]).is_err());
    }
}

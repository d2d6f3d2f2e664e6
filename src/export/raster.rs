//! Rasterization
//!
//! A [`RenderSurface`] is anything that can produce a bitmap of a rendered
//! certificate at a given scale. Laying out the certificate itself happens
//! outside this crate; [`BitmapSurface`] wraps a bitmap that was rendered
//! elsewhere (a page screenshot, for instance) and resamples it.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};

use super::ExportError;

/// Device-pixel scale used for print output
pub const DEFAULT_SCALE_FACTOR: f32 = 2.0;

/// Source of a rendered certificate bitmap
pub trait RenderSurface {
    /// Size at scale 1, in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Render at `scale` device pixels per CSS pixel
    fn rasterize(&self, scale: f32) -> Result<RgbaImage, ExportError>;
}

/// `ceil(width * scale) x ceil(height * scale)`
pub fn scaled_dimensions(width: u32, height: u32, scale: f32) -> Result<(u32, u32), ExportError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::RasterizeError(format!(
            "Scale factor must be positive, got {}",
            scale
        )));
    }
    let scale = f64::from(scale);
    let scaled = |px: u32| -> Result<u32, ExportError> {
        let value = (f64::from(px) * scale).ceil();
        if value > f64::from(u32::MAX) {
            return Err(ExportError::RasterizeError(format!(
                "Scaled size {} exceeds the maximum bitmap size",
                value
            )));
        }
        Ok(value as u32)
    };
    Ok((scaled(width)?, scaled(height)?))
}

/// A pre-rendered bitmap
#[derive(Debug, Clone)]
pub struct BitmapSurface {
    image: RgbaImage,
}

impl BitmapSurface {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode any format the `image` crate understands
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ExportError::RasterizeError(format!("Failed to decode image: {}", e)))?;
        Ok(Self::new(image.to_rgba8()))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            ExportError::RasterizeError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self::new(image.to_rgba8()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl RenderSurface for BitmapSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn rasterize(&self, scale: f32) -> Result<RgbaImage, ExportError> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::RasterizeError(
                "Surface has no content".to_string(),
            ));
        }
        let (target_width, target_height) = scaled_dimensions(width, height, scale)?;
        if (target_width, target_height) == (width, height) {
            return Ok(self.image.clone());
        }
        Ok(imageops::resize(
            &self.image,
            target_width,
            target_height,
            FilterType::CatmullRom,
        ))
    }
}

/// Encode a bitmap as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| ExportError::SerializationError(format!("Failed to encode PNG: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_scaled_dimensions_round_up() {
        assert_eq!(scaled_dimensions(100, 51, 2.0).unwrap(), (200, 102));
        assert_eq!(scaled_dimensions(3, 3, 1.5).unwrap(), (5, 5));
        assert!(scaled_dimensions(10, 10, 0.0).is_err());
        assert!(scaled_dimensions(10, 10, f32::NAN).is_err());
    }

    #[test]
    fn test_bitmap_surface_scales() {
        let surface = BitmapSurface::new(RgbaImage::from_pixel(10, 20, Rgba([1, 2, 3, 255])));
        let bitmap = surface.rasterize(DEFAULT_SCALE_FACTOR).unwrap();
        assert_eq!(bitmap.dimensions(), (20, 40));
        assert_eq!(surface.rasterize(1.0).unwrap().dimensions(), (10, 20));
    }

    #[test]
    fn test_empty_surface_fails() {
        let surface = BitmapSurface::new(RgbaImage::new(0, 0));
        assert!(matches!(
            surface.rasterize(2.0),
            Err(ExportError::RasterizeError(_))
        ));
    }

    #[test]
    fn test_png_round_trip() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 255]));
        let png = encode_png(&image).unwrap();
        let surface = BitmapSurface::from_bytes(&png).unwrap();
        assert_eq!(surface.image(), &image);
    }
}

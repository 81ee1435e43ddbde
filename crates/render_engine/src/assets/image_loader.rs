//! Image loading utilities for texture data
//!
//! Decodes PNG and JPEG files into tightly packed RGBA8 pixels.

use std::path::Path;

use crate::assets::{AssetError, AssetResult};

/// Decoded image ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Raw RGBA pixel data, rows top to bottom
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        if !path_ref.exists() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image {}: {}", path_ref.display(), e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();
        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self { data: rgba_img.into_raw(), width, height })
    }

    /// Decode an encoded image held in memory
    pub fn from_bytes(bytes: &[u8]) -> AssetResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image from bytes: {}", e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();
        log::debug!("Loaded image {}x{} from memory", width, height);

        Ok(Self { data: rgba_img.into_raw(), width, height })
    }

    /// Wrap already-decoded RGBA8 pixels
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> AssetResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AssetError::InvalidData(format!(
                "{}x{} image needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Create a solid color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    /// Mirror the rows so the first row becomes the bottom one
    pub fn flip_vertical(&mut self) {
        let row_len = self.width as usize * 4;
        if row_len == 0 {
            return;
        }
        let rows = self.data.len() / row_len;
        for top in 0..rows / 2 {
            let bottom = rows - 1 - top;
            let (upper, lower) = self.data.split_at_mut(bottom * row_len);
            upper[top * row_len..(top + 1) * row_len].swap_with_slice(&mut lower[..row_len]);
        }
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_flip_vertical_swaps_rows() {
        let mut img = ImageData::from_rgba8(
            1,
            3,
            vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3],
        )
        .expect("valid image");

        img.flip_vertical();

        assert_eq!(img.data, vec![3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(ImageData::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = ImageData::from_file("no/such/texture.png");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_png_bytes_decode_to_rgba() {
        let mut encoded = Vec::new();
        let source = image::RgbImage::from_pixel(2, 1, image::Rgb([10, 20, 30]));
        source
            .write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
            .expect("encode png");

        let img = ImageData::from_bytes(&encoded).expect("decode png");

        assert_eq!((img.width, img.height), (2, 1));
        assert_eq!(img.data, vec![10, 20, 30, 255, 10, 20, 30, 255]);
    }
}

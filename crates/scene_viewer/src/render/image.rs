//! Image buffers displayed by image windows
//!
//! Buffers come from an external capture subsystem. Windows only read the
//! dimensions, the row stride, the pixel format and the raw bytes.

use image::DynamicImage;
use thiserror::Error;

/// Image buffer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Sample storage shorter than `stride * height`
    #[error("Image buffer too small: expected {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// Required byte count
        expected: usize,
        /// Provided byte count
        actual: usize,
    },

    /// Stride shorter than a row or not a whole number of pixels
    #[error("Invalid row stride {stride} for {width} pixels of {pixel_size} bytes")]
    InvalidStride {
        /// Row stride in bytes
        stride: usize,
        /// Row width in pixels
        width: u32,
        /// Bytes per pixel
        pixel_size: usize,
    },

    /// Source image color type has no matching layout
    #[error("Unsupported color type: {0}")]
    UnsupportedColorType(String),
}

/// Channel order of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single channel
    Luminance,
    /// Red, green, blue
    Rgb,
    /// Blue, green, red
    Bgr,
    /// Red, green, blue, alpha
    Rgba,
    /// Blue, green, red, alpha
    Bgra,
}

impl PixelLayout {
    /// Channels per pixel
    pub const fn channels(self) -> usize {
        match self {
            Self::Luminance => 1,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }
}

/// Storage type of one channel sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// 8-bit unsigned
    U8,
    /// 16-bit unsigned
    U16,
    /// 32-bit float
    F32,
}

impl SampleType {
    /// Bytes per sample
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }
}

/// Pixel format tag: channel layout plus sample type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Channel order
    pub layout: PixelLayout,
    /// Sample storage
    pub sample: SampleType,
}

impl PixelFormat {
    /// 8-bit RGB
    pub const RGB8: Self = Self::new(PixelLayout::Rgb, SampleType::U8);
    /// 8-bit BGR, the usual camera capture order
    pub const BGR8: Self = Self::new(PixelLayout::Bgr, SampleType::U8);
    /// 8-bit RGBA
    pub const RGBA8: Self = Self::new(PixelLayout::Rgba, SampleType::U8);
    /// 8-bit grayscale
    pub const GRAY8: Self = Self::new(PixelLayout::Luminance, SampleType::U8);
    /// 16-bit grayscale
    pub const GRAY16: Self = Self::new(PixelLayout::Luminance, SampleType::U16);

    /// Create a format tag
    pub const fn new(layout: PixelLayout, sample: SampleType) -> Self {
        Self { layout, sample }
    }

    /// Bytes per pixel
    pub const fn pixel_size(self) -> usize {
        self.layout.channels() * self.sample.size()
    }
}

/// Raw image: dimensions, row stride, format and bytes
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Wrap raw bytes
    ///
    /// `stride` is the distance in bytes between the starts of two rows and
    /// must hold a whole number of pixels.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let pixel_size = format.pixel_size();
        let row_bytes = (width as usize).checked_mul(pixel_size);
        if !row_bytes.is_some_and(|row| stride >= row) || stride % pixel_size != 0 {
            return Err(ImageError::InvalidStride { stride, width, pixel_size });
        }

        // An unrepresentable size can never be backed by a buffer
        let expected = stride.checked_mul(height as usize).unwrap_or(usize::MAX);
        if data.len() < expected {
            return Err(ImageError::BufferTooSmall { expected, actual: data.len() });
        }

        Ok(Self { width, height, stride, format, data })
    }

    /// Wrap tightly packed typed samples
    pub fn from_samples<T: bytemuck::Pod>(
        width: u32,
        height: u32,
        format: PixelFormat,
        samples: &[T],
    ) -> Result<Self, ImageError> {
        let bytes: &[u8] = bytemuck::cast_slice(samples);
        let stride = (width as usize).saturating_mul(format.pixel_size());
        Self::from_raw(width, height, stride, format, bytes.to_vec())
    }

    /// Convert a decoded image
    ///
    /// 8-bit gray, RGB and RGBA keep their layout; 16-bit gray keeps its
    /// depth; everything else is converted to 8-bit RGBA.
    pub fn from_dynamic_image(image: DynamicImage) -> Result<Self, ImageError> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(buf) => {
                Self::from_samples(width, height, PixelFormat::GRAY8, buf.as_raw())
            }
            DynamicImage::ImageLuma16(buf) => {
                Self::from_samples(width, height, PixelFormat::GRAY16, buf.as_raw())
            }
            DynamicImage::ImageRgb8(buf) => {
                Self::from_samples(width, height, PixelFormat::RGB8, buf.as_raw())
            }
            DynamicImage::ImageRgba8(buf) => {
                Self::from_samples(width, height, PixelFormat::RGBA8, buf.as_raw())
            }
            other if other.color().has_color() || other.color().has_alpha() => {
                let rgba = other.to_rgba8();
                Self::from_samples(width, height, PixelFormat::RGBA8, rgba.as_raw())
            }
            other => Err(ImageError::UnsupportedColorType(format!("{:?}", other.color()))),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel format tag
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw bytes, `stride * height` long at least
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Row length in pixels, padding included
    pub fn row_length(&self) -> usize {
        self.stride / self.format.pixel_size()
    }

    /// Unpack alignment for texture upload: 4 when rows start on 4-byte
    /// boundaries, 1 otherwise
    pub fn unpack_alignment(&self) -> i32 {
        if self.stride & 3 == 0 { 4 } else { 1 }
    }

    /// Horizontal texture coordinate of the last real pixel column
    pub fn visible_u(&self) -> f32 {
        match self.row_length() {
            0 => 0.0,
            row => self.width as f32 / row as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_padded_rows() {
        // 3 RGB pixels = 9 bytes, padded to 12
        let image = ImageBuffer::from_raw(3, 2, 12, PixelFormat::RGB8, vec![0; 24]).unwrap();

        assert_eq!(image.row_length(), 4);
        assert_eq!(image.unpack_alignment(), 4);
        assert_relative_eq!(image.visible_u(), 0.75);
    }

    #[test]
    fn test_odd_stride_uses_byte_alignment() {
        let image = ImageBuffer::from_raw(3, 1, 9, PixelFormat::BGR8, vec![0; 9]).unwrap();
        assert_eq!(image.unpack_alignment(), 1);
        assert_eq!(image.row_length(), 3);
    }

    #[test]
    fn test_rejects_short_buffers_and_strides() {
        assert_eq!(
            ImageBuffer::from_raw(4, 4, 4, PixelFormat::GRAY8, vec![0; 15]),
            Err(ImageError::BufferTooSmall { expected: 16, actual: 15 })
        );
        assert!(matches!(
            ImageBuffer::from_raw(4, 4, 3, PixelFormat::GRAY8, vec![0; 16]),
            Err(ImageError::InvalidStride { .. })
        ));
        assert!(matches!(
            ImageBuffer::from_raw(1, 1, 3, PixelFormat::GRAY16, vec![0; 3]),
            Err(ImageError::InvalidStride { .. })
        ));
    }

    #[test]
    fn test_rejects_sizes_past_address_space() {
        let stride = usize::MAX / 2;
        assert_eq!(
            ImageBuffer::from_raw(1, 3, stride, PixelFormat::GRAY8, vec![0; 4]),
            Err(ImageError::BufferTooSmall { expected: usize::MAX, actual: 4 })
        );
        assert!(matches!(
            ImageBuffer::from_raw(u32::MAX, 1, 8, PixelFormat::RGBA8, vec![0; 8]),
            Err(ImageError::InvalidStride { .. })
        ));
    }

    #[test]
    fn test_typed_samples() {
        let samples: Vec<u16> = vec![0, 1000, 2000, 65535];
        let image = ImageBuffer::from_samples(2, 2, PixelFormat::GRAY16, &samples).unwrap();

        assert_eq!(image.stride(), 4);
        assert_eq!(image.data().len(), 8);
        assert_eq!(image.format().pixel_size(), 2);
    }

    #[test]
    fn test_from_dynamic_image() {
        let rgb = image::RgbImage::new(5, 3);
        let image = ImageBuffer::from_dynamic_image(DynamicImage::ImageRgb8(rgb)).unwrap();

        assert_eq!((image.width(), image.height()), (5, 3));
        assert_eq!(image.format(), PixelFormat::RGB8);
        assert_eq!(image.stride(), 15);
        assert_eq!(image.unpack_alignment(), 1);
    }
}

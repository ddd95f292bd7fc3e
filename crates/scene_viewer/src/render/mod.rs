//! Frame-buffer data shown by image windows

pub mod image;

pub use self::image::{ImageBuffer, ImageError, PixelFormat, PixelLayout, SampleType};

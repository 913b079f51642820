//! Conversions between `image` crate buffers and the core image types.

use advision_core::{Image, ImageView};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use std::path::Path;

/// Errors produced by the frame helpers.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("image of {width}x{height} pixels does not fit the image crate's u32 dimensions")]
    TooLarge { width: usize, height: usize },

    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub fn gray_view(img: &GrayImage) -> ImageView<'_> {
    ImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 1,
        data: img.as_raw(),
    }
}

pub fn rgb_view(img: &RgbImage) -> ImageView<'_> {
    ImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw(),
    }
}

pub fn rgba_view(img: &RgbaImage) -> ImageView<'_> {
    ImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 4,
        data: img.as_raw(),
    }
}

/// Copy a decoded image into a core [`Image`], keeping gray, RGB or RGBA
/// layout and converting anything else to RGB8.
pub fn image_from_dynamic(img: &DynamicImage) -> Image {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (channels, data) = match img {
        DynamicImage::ImageLuma8(g) => (1, g.as_raw().clone()),
        DynamicImage::ImageRgb8(rgb) => (3, rgb.as_raw().clone()),
        DynamicImage::ImageRgba8(rgba) => (4, rgba.as_raw().clone()),
        other => (3, other.to_rgb8().into_raw()),
    };
    Image {
        width,
        height,
        channels,
        data,
    }
}

/// Wrap a core image as a `DynamicImage`.
pub fn to_dynamic(img: &Image) -> Result<DynamicImage, FrameError> {
    let (Ok(w), Ok(h)) = (u32::try_from(img.width), u32::try_from(img.height)) else {
        return Err(FrameError::TooLarge {
            width: img.width,
            height: img.height,
        });
    };
    let expected = img.width * img.height * img.channels;
    if img.data.len() != expected {
        return Err(FrameError::InvalidBuffer {
            expected,
            got: img.data.len(),
        });
    }
    let bad_dims = || FrameError::InvalidDimensions {
        width: w,
        height: h,
    };
    let data = img.data.clone();
    Ok(match img.channels {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, data).ok_or_else(bad_dims)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, data).ok_or_else(bad_dims)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, data).ok_or_else(bad_dims)?),
        c => return Err(FrameError::UnsupportedChannels(c)),
    })
}

/// Build a core image from a raw interleaved buffer.
pub fn image_from_slice(
    width: u32,
    height: u32,
    channels: usize,
    pixels: &[u8],
) -> Result<Image, FrameError> {
    if !matches!(channels, 1 | 3 | 4) {
        return Err(FrameError::UnsupportedChannels(channels));
    }
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(FrameError::InvalidDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(channels)) else {
        return Err(FrameError::InvalidDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(FrameError::InvalidBuffer {
            expected,
            got: pixels.len(),
        });
    }
    Image::from_raw(w, h, channels, pixels.to_vec())
        .ok_or(FrameError::InvalidDimensions { width, height })
}

/// Decode an image file into a core image.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Image, FrameError> {
    let img = image::ImageReader::open(path)?.decode()?;
    Ok(image_from_dynamic(&img))
}

/// Encode a core image; the format follows the file extension.
pub fn save_image(img: &Image, path: impl AsRef<Path>) -> Result<(), FrameError> {
    to_dynamic(img)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_round_trip_keeps_layout() {
        let rgb = RgbImage::from_fn(5, 3, |x, y| image::Rgb([x as u8, y as u8, 9]));
        let core = image_from_dynamic(&DynamicImage::ImageRgb8(rgb.clone()));
        assert_eq!((core.width, core.height, core.channels), (5, 3, 3));
        assert_eq!(core.pixel(4, 2), &[4, 2, 9]);
        assert_eq!(rgb_view(&rgb).data, core.data.as_slice());

        let back = to_dynamic(&core).expect("rgb");
        assert_eq!(back.to_rgb8(), rgb);
    }

    #[test]
    fn slices_are_validated() {
        assert!(matches!(
            image_from_slice(4, 4, 3, &[0; 10]),
            Err(FrameError::InvalidBuffer { expected: 48, got: 10 })
        ));
        assert!(matches!(
            image_from_slice(2, 2, 2, &[0; 8]),
            Err(FrameError::UnsupportedChannels(2))
        ));
        let gray = image_from_slice(2, 1, 1, &[7, 8]).expect("gray");
        assert_eq!(gray.data, vec![7, 8]);
    }

    #[test]
    fn views_borrow_gray_and_rgba_buffers() {
        let gray = GrayImage::from_fn(3, 2, |x, y| image::Luma([(x + 10 * y) as u8]));
        let v = gray_view(&gray);
        assert_eq!((v.width, v.height, v.channels), (3, 2, 1));
        assert_eq!(v.pixel(2, 1), &[12]);

        let rgba = RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 4]));
        let v = rgba_view(&rgba);
        assert_eq!(v.channels, 4);
        assert_eq!(v.pixel(1, 1), &[1, 2, 3, 4]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_images_report_their_real_size() {
        let wide = Image {
            width: u32::MAX as usize + 1,
            height: 1,
            channels: 1,
            data: Vec::new(),
        };
        match to_dynamic(&wide) {
            Err(FrameError::TooLarge { width, height }) => {
                assert_eq!((width, height), (u32::MAX as usize + 1, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

use crate::Size;
use serde::{Deserialize, Serialize};

/// Borrowed row-major, interleaved 8-bit image. Row 0 is the top row.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8], // len = w*h*channels
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

/// Quarter-turn applied to a rectified image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Up,
    /// 90° clockwise.
    Right,
    Down,
    /// 90° counter-clockwise.
    Left,
}

impl<'a> ImageView<'a> {
    /// Wrap a raw buffer; `None` when the length does not match.
    pub fn new(width: usize, height: usize, channels: usize, data: &'a [u8]) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(channels)?;
        (channels > 0 && data.len() == expected).then_some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Copy the `w`×`h` block starting at column `x0`, row `y0`.
    ///
    /// The block is clipped to the image; pixels outside stay zero.
    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> Image {
        let mut out = Image::new(w, h, self.channels);
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return out;
        }
        let row_len = (x1 - x0) * self.channels;
        for y in y0..y1 {
            let src = (y * self.width + x0) * self.channels;
            let dst = (y - y0) * w * self.channels;
            out.data[dst..dst + row_len].copy_from_slice(&self.data[src..src + row_len]);
        }
        out
    }
}

impl Image {
    /// Zero-filled image.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0u8; width * height * channels],
        }
    }

    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Option<Self> {
        ImageView::new(width, height, channels, &data)?;
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = (y * self.width + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }

    /// Rotate by a fixed quarter-turn. `Right` and `Left` swap width and height.
    pub fn oriented(&self, orientation: Orientation) -> Image {
        let (w, h) = (self.width, self.height);
        let (ow, oh) = match orientation {
            Orientation::Up | Orientation::Down => (w, h),
            Orientation::Right | Orientation::Left => (h, w),
        };
        let mut out = Image::new(ow, oh, self.channels);
        for oy in 0..oh {
            for ox in 0..ow {
                let (sx, sy) = match orientation {
                    Orientation::Up => (ox, oy),
                    Orientation::Right => (oy, h - 1 - ox),
                    Orientation::Down => (w - 1 - ox, h - 1 - oy),
                    Orientation::Left => (w - 1 - oy, ox),
                };
                out.pixel_mut(ox, oy).copy_from_slice(self.pixel(sx, sy));
            }
        }
        out
    }
}

#[inline]
fn get_channel(src: &ImageView<'_>, x: i32, y: i32, c: usize) -> u8 {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return 0;
    }
    src.data[(y as usize * src.width + x as usize) * src.channels + c]
}

/// Bilinear sample of channel `c` at `(x, y)`, pixel centers on integers.
/// Out-of-bounds neighbours read as zero, and so do non-finite coordinates.
#[inline]
pub fn sample_bilinear(src: &ImageView<'_>, x: f32, y: f32, c: usize) -> f32 {
    // Points on a homography's vanishing line map to infinity.
    if !(x > -1.0 && x < src.width as f32 && y > -1.0 && y < src.height as f32) {
        return 0.0;
    }
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_channel(src, x0, y0, c) as f32;
    let p10 = get_channel(src, x0 + 1, y0, c) as f32;
    let p01 = get_channel(src, x0, y0 + 1, c) as f32;
    let p11 = get_channel(src, x0 + 1, y0 + 1, c) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[inline]
pub fn sample_bilinear_u8(src: &ImageView<'_>, x: f32, y: f32, c: usize) -> u8 {
    sample_bilinear(src, x, y, c).round().clamp(0.0, 255.0) as u8
}

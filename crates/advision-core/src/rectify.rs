//! Perspective rectification of a detected quadrilateral.
//!
//! Inputs are in the detector's pixel space: origin at the bottom-left of
//! the frame, Y up. Image buffers store row 0 at the top, so points are
//! flipped (`row = height - y`) before sampling. With that convention the
//! `top_left` corner ends up at the top-left of the rectified output.

use crate::{
    homography_from_4pt, warp_perspective, Homography, Image, ImageView, Orientation, PixelPoint,
    PixelRect, Size,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RectifyError {
    #[error("region {region:?} is not inside the {image:?} image extent")]
    InvalidRegion { region: PixelRect, image: Size },
    #[error("could not render a rectified image: {reason}")]
    ConversionFailure { reason: &'static str },
}

/// Four corners of a detected quadrilateral, in pixel space.
///
/// No ordering is enforced. The corners must follow the detector's
/// convention; swapped corners produce a mirrored or scrambled image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadCorners {
    pub top_left: PixelPoint,
    pub top_right: PixelPoint,
    pub bottom_left: PixelPoint,
    pub bottom_right: PixelPoint,
}

impl QuadCorners {
    /// Corners of an axis-aligned rectangle (Y up).
    pub fn from_rect(rect: &PixelRect) -> Self {
        Self {
            top_left: PixelPoint::new(rect.min_x(), rect.max_y()),
            top_right: PixelPoint::new(rect.max_x(), rect.max_y()),
            bottom_left: PixelPoint::new(rect.min_x(), rect.min_y()),
            bottom_right: PixelPoint::new(rect.max_x(), rect.min_y()),
        }
    }

    /// TL, TR, BL, BR.
    pub fn to_array(&self) -> [PixelPoint; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

/// Rectification settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Quarter-turn applied after the perspective warp.
    pub orientation: Orientation,
    /// Reject outputs whose shorter side (in pixels) is below this.
    pub min_output_side: usize,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            orientation: Orientation::Up,
            min_output_side: 1,
        }
    }
}

/// A rectified, upright image of a detected region.
#[derive(Clone, Debug)]
pub struct RectifiedImage {
    pub image: Image,
    /// Maps rectified pixel coordinates (before orientation) into the
    /// cropped source buffer.
    pub h_crop_from_rect: Homography,
    /// Integer crop window in buffer coordinates: `[x0, y0, w, h]`.
    pub crop: [usize; 4],
}

/// Crop `src` to `region`, then warp the quad `corners` onto the upright
/// rectangle of the region's size.
///
/// Fails with [`RectifyError::InvalidRegion`] when `region` leaves the image
/// extent and with [`RectifyError::ConversionFailure`] when no image can be
/// produced (zero area, singular corner layout).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "info",
        skip(src, corners, params),
        fields(width = src.width, height = src.height)
    )
)]
pub fn rectify(
    src: &ImageView<'_>,
    region: &PixelRect,
    corners: &QuadCorners,
    params: &RectifyParams,
) -> Result<RectifiedImage, RectifyError> {
    let extent = PixelRect::extent(src.size());
    if !extent.contains_rect(region) {
        return Err(RectifyError::InvalidRegion {
            region: *region,
            image: src.size(),
        });
    }

    let out_w = region.size.width.round() as usize;
    let out_h = region.size.height.round() as usize;
    if out_w.min(out_h) < params.min_output_side.max(1) {
        return Err(RectifyError::ConversionFailure {
            reason: "region has no area",
        });
    }

    // Crop window in buffer rows (top-left origin).
    let img_h = src.height as f32;
    let x0 = region.min_x().floor() as usize;
    let y0 = (img_h - region.max_y()).max(0.0).floor() as usize;
    let x1 = (region.max_x().ceil() as usize).min(src.width);
    let y1 = ((img_h - region.min_y()).ceil() as usize).min(src.height);
    if x1 <= x0 || y1 <= y0 {
        return Err(RectifyError::ConversionFailure {
            reason: "crop window is empty",
        });
    }
    let cropped = src.crop(x0, y0, x1 - x0, y1 - y0);

    let to_crop = |p: PixelPoint| Point2::new(p.x - x0 as f32, img_h - p.y - y0 as f32);
    let src_quad = corners.to_array().map(to_crop);
    let (w, h) = (out_w as f32, out_h as f32);
    let dst_quad = [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(0.0, h),
        Point2::new(w, h),
    ];

    let h_crop_from_rect =
        homography_from_4pt(&dst_quad, &src_quad).ok_or(RectifyError::ConversionFailure {
            reason: "corner layout is singular",
        })?;

    let warped = warp_perspective(&cropped.view(), h_crop_from_rect, out_w, out_h);
    let image = match params.orientation {
        Orientation::Up => warped,
        o => warped.oriented(o),
    };

    log::debug!(
        "rectified {}x{} region at ({:.1}, {:.1}) into {}x{}",
        out_w,
        out_h,
        region.min_x(),
        region.min_y(),
        image.width,
        image.height
    );

    Ok(RectifiedImage {
        image,
        h_crop_from_rect,
        crop: [x0, y0, x1 - x0, y1 - y0],
    })
}

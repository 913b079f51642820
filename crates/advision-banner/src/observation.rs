//! Rectangle observations from the detector and their rectification.

use advision_core::{
    rectify, ImageView, NormalizedPoint, NormalizedRect, PixelRect, QuadCorners, RectifiedImage,
    RectifyError, RectifyParams, Size,
};
use serde::{Deserialize, Serialize};

/// One rectangle reported by the detector, in normalized coordinates
/// (origin bottom-left, Y up).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectangleObservation {
    pub bounding_box: NormalizedRect,
    pub top_left: NormalizedPoint,
    pub top_right: NormalizedPoint,
    pub bottom_left: NormalizedPoint,
    pub bottom_right: NormalizedPoint,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl RectangleObservation {
    /// Build an observation from four corners; the bounding box is their hull.
    pub fn from_corners(
        top_left: NormalizedPoint,
        top_right: NormalizedPoint,
        bottom_left: NormalizedPoint,
        bottom_right: NormalizedPoint,
    ) -> Self {
        let pts = [top_left, top_right, bottom_left, bottom_right];
        let min_x = pts.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let min_y = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_x = pts.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let max_y = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        Self {
            bounding_box: NormalizedRect::new(min_x, min_y, max_x - min_x, max_y - min_y),
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            confidence: 1.0,
        }
    }

    /// Re-express coordinates given relative to `roi` in full-frame terms.
    pub fn mapped_from_roi(&self, roi: &NormalizedRect) -> Self {
        let map = |p: NormalizedPoint| {
            NormalizedPoint::new(
                roi.origin.x + p.x * roi.size.width,
                roi.origin.y + p.y * roi.size.height,
            )
        };
        let bb = &self.bounding_box;
        Self {
            bounding_box: NormalizedRect {
                origin: map(bb.origin),
                size: Size::new(
                    bb.size.width * roi.size.width,
                    bb.size.height * roi.size.height,
                ),
            },
            top_left: map(self.top_left),
            top_right: map(self.top_right),
            bottom_left: map(self.bottom_left),
            bottom_right: map(self.bottom_right),
            confidence: self.confidence,
        }
    }

    /// Scale the bounding box and corners into pixel space of `size`.
    pub fn to_pixel(&self, size: Size) -> (PixelRect, QuadCorners) {
        let corners = QuadCorners {
            top_left: self.top_left.scaled(size),
            top_right: self.top_right.scaled(size),
            bottom_left: self.bottom_left.scaled(size),
            bottom_right: self.bottom_right.scaled(size),
        };
        (self.bounding_box.scaled(size), corners)
    }
}

/// Scale `observation` to `frame`, check it against the frame extent and
/// rectify it.
pub fn rectify_observation(
    frame: &ImageView<'_>,
    observation: &RectangleObservation,
    params: &RectifyParams,
) -> Result<RectifiedImage, RectifyError> {
    let (region, corners) = observation.to_pixel(frame.size());
    rectify(frame, &region, &corners, params)
}

/// Rectify every observation independently, in input order.
///
/// A failed observation never affects the others.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(count = observations.len()))
)]
pub fn rectify_batch(
    frame: &ImageView<'_>,
    observations: &[RectangleObservation],
    params: &RectifyParams,
) -> Vec<Result<RectifiedImage, RectifyError>> {
    observations
        .iter()
        .enumerate()
        .map(|(idx, obs)| {
            let res = rectify_observation(frame, obs, params);
            if let Err(err) = &res {
                log::warn!("dropping detection {idx}: {err}");
            }
            res
        })
        .collect()
}

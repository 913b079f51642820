//! Geometry core for banner recognition in an AR camera feed.
//!
//! Three pure pieces, all free functions over value types:
//! - coordinate mapping between normalized detector output and pixels,
//! - rectification of a detected quadrilateral into an upright image,
//! - placement of a new anchor at a measured distance in front of the camera.
//!
//! Nothing here holds state or does I/O, so every function is safe to call
//! from any thread.

mod coords;
mod homography;
mod image;
mod logger;
mod pose;
mod rectify;

pub use coords::{
    remap_point, scale_point, scale_rect, NormalizedPoint, NormalizedRect, PixelPoint, PixelRect,
    Size,
};
pub use homography::{homography_from_4pt, warp_perspective, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, Image, ImageView, Orientation};
pub use pose::{overlay_pose, place_anchor, Pose, PoseColumns};
pub use rectify::{rectify, QuadCorners, RectifiedImage, RectifyError, RectifyParams};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};

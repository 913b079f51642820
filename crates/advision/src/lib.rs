//! High-level facade crate for the `advision-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry core and the banner pipeline,
//! - (feature `image`) conversions from `image` crate buffers and a
//!   JSON-configured batch rectifier,
//! - (feature `cli`) the `advision` command line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use advision::banner::{rectify_observation, RectangleObservation};
//! use advision::core::{NormalizedPoint, RectifyParams};
//! use advision::frame::load_frame;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = load_frame("frame.png")?;
//! let p = NormalizedPoint::new;
//! let obs = RectangleObservation::from_corners(p(0.1, 0.3), p(0.3, 0.3), p(0.1, 0.1), p(0.3, 0.1));
//! let rectified = rectify_observation(&frame.view(), &obs, &RectifyParams::default())?;
//! println!("{}x{}", rectified.image.width, rectified.image.height);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `advision::core`: coordinates, images, homographies, rectification, poses.
//! - `advision::banner`: observations, classifier seam, reference library.
//! - `advision::frame` (feature `image`): `image` crate interop.
//! - `advision::batch` (feature `image`): config-driven batch rectification.

pub use advision_banner as banner;
pub use advision_core as core;

pub use advision_banner::{
    BannerPipeline, Classification, Classifier, DetectionOutcome, PipelineParams,
    RectangleObservation, ReferenceLibrary,
};
pub use advision_core::{
    place_anchor, rectify, NormalizedPoint, NormalizedRect, PixelPoint, PixelRect, Pose,
    QuadCorners, RectifyError, RectifyParams, Size,
};

#[cfg(feature = "image")]
pub mod batch;
#[cfg(feature = "image")]
pub mod frame;

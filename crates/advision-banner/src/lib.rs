//! Banner recognition on top of `advision-core`.
//!
//! - rectangle observations from a detector, scaled and rectified per frame,
//! - a [`Classifier`] seam for naming rectified banners,
//! - a [`ReferenceLibrary`] of recognized banners for image tracking,
//! - JSON configuration and reports for batch runs.

mod classify;
mod io;
mod library;
mod links;
mod observation;
mod pipeline;

pub use classify::{best_classification, Classification, Classifier};
pub use io::{BannerIoError, RectifiedEntry, RectifyConfig, RectifyReport};
pub use library::{ReferenceImage, ReferenceLibrary, DEFAULT_PHYSICAL_WIDTH_M};
pub use links::LinkTable;
pub use observation::{rectify_batch, rectify_observation, RectangleObservation};
pub use pipeline::{BannerPipeline, DetectionOutcome, PipelineError, PipelineParams};

pub use advision_core::{Orientation, RectifyError, RectifyParams};

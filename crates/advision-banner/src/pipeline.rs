//! Per-frame banner recognition: rectify, classify, remember.

use crate::classify::{best_classification, Classification, Classifier};
use crate::library::{ReferenceImage, ReferenceLibrary, DEFAULT_PHYSICAL_WIDTH_M};
use crate::observation::{rectify_observation, RectangleObservation};
use advision_core::{ImageView, NormalizedRect, Orientation, RectifyError, RectifyParams};
use serde::{Deserialize, Serialize};

/// Errors for a single detection. None of them stop the frame.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Rectify(#[from] RectifyError),
    #[error("classifier failed: {0}")]
    Classifier(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("classifier returned no results")]
    NoClassification,
}

fn default_min_confidence() -> f32 {
    0.5
}

fn default_physical_width() -> f32 {
    DEFAULT_PHYSICAL_WIDTH_M
}

fn default_rectify() -> RectifyParams {
    RectifyParams {
        orientation: Orientation::Right,
        ..RectifyParams::default()
    }
}

/// Parameters for [`BannerPipeline`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Classifier expects portrait input, so the default turns clockwise.
    #[serde(default = "default_rectify")]
    pub rectify: RectifyParams,
    /// Best classifications below this are not used as labels.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// Observations below this detector confidence are skipped.
    #[serde(default)]
    pub min_detection_confidence: f32,
    /// When set, observations are relative to this part of the frame.
    #[serde(default)]
    pub region_of_interest: Option<NormalizedRect>,
    #[serde(default = "default_physical_width")]
    pub physical_width_m: f32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            rectify: default_rectify(),
            min_confidence: default_min_confidence(),
            min_detection_confidence: 0.0,
            region_of_interest: None,
            physical_width_m: DEFAULT_PHYSICAL_WIDTH_M,
        }
    }
}

/// What happened to one observation of a frame.
#[derive(Debug)]
pub enum DetectionOutcome {
    /// Classified with enough confidence; stored under that label.
    Recognized {
        index: usize,
        classification: Classification,
        width: usize,
        height: usize,
    },
    /// Rectified, but the best label was too weak.
    LowConfidence {
        index: usize,
        best: Classification,
    },
    /// Detector confidence below the threshold.
    Skipped { index: usize },
    Failed { index: usize, error: PipelineError },
}

impl DetectionOutcome {
    pub fn index(&self) -> usize {
        match self {
            DetectionOutcome::Recognized { index, .. }
            | DetectionOutcome::LowConfidence { index, .. }
            | DetectionOutcome::Skipped { index }
            | DetectionOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DetectionOutcome::Recognized { classification, .. } => {
                Some(classification.identifier.as_str())
            }
            _ => None,
        }
    }
}

/// Runs rectification and classification for every rectangle in a frame
/// and keeps recognized banners as reference images.
pub struct BannerPipeline<C> {
    classifier: C,
    params: PipelineParams,
    library: ReferenceLibrary,
}

impl<C: Classifier> BannerPipeline<C> {
    pub fn new(classifier: C, params: PipelineParams) -> Self {
        Self {
            classifier,
            params,
            library: ReferenceLibrary::new(),
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn library(&self) -> &ReferenceLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut ReferenceLibrary {
        &mut self.library
    }

    /// Process all observations of one frame, in order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "info",
            skip_all,
            fields(width = frame.width, height = frame.height, count = observations.len())
        )
    )]
    pub fn process_frame(
        &mut self,
        frame: &ImageView<'_>,
        observations: &[RectangleObservation],
    ) -> Vec<DetectionOutcome> {
        if observations.is_empty() {
            log::debug!("no rectangles in frame");
        }
        observations
            .iter()
            .enumerate()
            .map(|(index, obs)| {
                let outcome = self.process_one(frame, index, obs);
                if let DetectionOutcome::Failed { error, .. } = &outcome {
                    log::warn!("detection {index} dropped: {error}");
                }
                outcome
            })
            .collect()
    }

    fn process_one(
        &mut self,
        frame: &ImageView<'_>,
        index: usize,
        obs: &RectangleObservation,
    ) -> DetectionOutcome {
        if obs.confidence < self.params.min_detection_confidence {
            return DetectionOutcome::Skipped { index };
        }
        let obs = match &self.params.region_of_interest {
            Some(roi) => obs.mapped_from_roi(roi),
            None => *obs,
        };

        let rectified = match rectify_observation(frame, &obs, &self.params.rectify) {
            Ok(r) => r.image,
            Err(e) => {
                return DetectionOutcome::Failed {
                    index,
                    error: e.into(),
                }
            }
        };
        let (width, height) = (rectified.width, rectified.height);

        self.library.push_pending(ReferenceImage::new(
            rectified,
            self.params.physical_width_m,
        ));
        let outcome = self.classify_latest(index, width, height);
        if !matches!(outcome, DetectionOutcome::Recognized { .. }) {
            self.library.discard_latest();
        }
        outcome
    }

    /// Classify the latest pending image and label it when confident.
    fn classify_latest(&mut self, index: usize, width: usize, height: usize) -> DetectionOutcome {
        let Some(pending) = self.library.latest_pending() else {
            return DetectionOutcome::Failed {
                index,
                error: PipelineError::NoClassification,
            };
        };
        let results = match self.classifier.classify(&pending.image.view()) {
            Ok(r) => r,
            Err(e) => {
                return DetectionOutcome::Failed {
                    index,
                    error: PipelineError::Classifier(Box::new(e)),
                }
            }
        };
        let Some(best) = best_classification(&results).cloned() else {
            return DetectionOutcome::Failed {
                index,
                error: PipelineError::NoClassification,
            };
        };
        log::info!(
            "classification {:?} confidence {:.3}",
            best.identifier,
            best.confidence
        );

        if best.confidence < self.params.min_confidence {
            return DetectionOutcome::LowConfidence { index, best };
        }

        self.library.label_latest(&best.identifier);
        DetectionOutcome::Recognized {
            index,
            classification: best,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advision_core::{Image, NormalizedPoint};

    /// Labels by mean brightness of the first channel.
    struct Brightness;

    impl Classifier for Brightness {
        type Error = std::io::Error;

        fn classify(&self, image: &ImageView<'_>) -> Result<Vec<Classification>, Self::Error> {
            if image.data.is_empty() {
                return Err(std::io::Error::other("empty"));
            }
            let n = (image.width * image.height) as f32;
            let mean = image
                .data
                .iter()
                .step_by(image.channels)
                .map(|&v| v as f32)
                .sum::<f32>()
                / n;
            Ok(vec![
                Classification::new("bright", mean / 255.0),
                Classification::new("dark", 1.0 - mean / 255.0),
            ])
        }
    }

    struct Silent;

    impl Classifier for Silent {
        type Error = std::convert::Infallible;

        fn classify(&self, _: &ImageView<'_>) -> Result<Vec<Classification>, Self::Error> {
            Ok(Vec::new())
        }
    }

    fn obs(x0: f32, y0: f32, x1: f32, y1: f32) -> RectangleObservation {
        let p = NormalizedPoint::new;
        RectangleObservation::from_corners(p(x0, y1), p(x1, y1), p(x0, y0), p(x1, y0))
    }

    /// Left half white, right half black.
    fn frame() -> Image {
        let mut img = Image::new(100, 60, 3);
        for y in 0..60 {
            for x in 0..50 {
                img.pixel_mut(x, y).copy_from_slice(&[255, 255, 255]);
            }
        }
        img
    }

    #[test]
    fn recognizes_and_stores_each_banner() {
        let img = frame();
        let mut pipeline = BannerPipeline::new(Brightness, PipelineParams::default());
        let out = pipeline.process_frame(
            &img.view(),
            &[obs(0.1, 0.1, 0.4, 0.5), obs(0.6, 0.1, 0.9, 0.5)],
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label(), Some("bright"));
        assert_eq!(out[1].label(), Some("dark"));
        // Portrait turn: 30x24 region comes out 24 wide, 30 tall.
        match &out[0] {
            DetectionOutcome::Recognized { width, height, .. } => {
                assert_eq!((*width, *height), (24, 30));
            }
            other => panic!("unexpected {other:?}"),
        }
        let lib = pipeline.library();
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.pending_len(), 0);
        assert!(lib.get("bright").is_some());
    }

    #[test]
    fn failures_and_skips_leave_siblings_alone() {
        let _ = env_logger::builder().is_test(true).try_init();
        let img = frame();
        let params = PipelineParams {
            min_detection_confidence: 0.5,
            ..PipelineParams::default()
        };
        let mut weak = obs(0.1, 0.1, 0.4, 0.5);
        weak.confidence = 0.2;
        let outside = obs(0.7, 0.7, 1.3, 0.9);

        let mut pipeline = BannerPipeline::new(Brightness, params);
        let out = pipeline.process_frame(&img.view(), &[outside, weak, obs(0.1, 0.1, 0.4, 0.5)]);

        assert!(matches!(
            out[0],
            DetectionOutcome::Failed {
                error: PipelineError::Rectify(RectifyError::InvalidRegion { .. }),
                ..
            }
        ));
        assert!(matches!(out[1], DetectionOutcome::Skipped { index: 1 }));
        assert_eq!(out[2].label(), Some("bright"));
        assert_eq!(out.iter().map(DetectionOutcome::index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn weak_labels_are_not_stored() {
        let img = frame();
        let params = PipelineParams {
            min_confidence: 0.99,
            ..PipelineParams::default()
        };
        // Straddles the white/black boundary: neither label is certain.
        let mut pipeline = BannerPipeline::new(Brightness, params);
        let out = pipeline.process_frame(&img.view(), &[obs(0.3, 0.1, 0.7, 0.5)]);
        assert!(matches!(out[0], DetectionOutcome::LowConfidence { .. }));
        assert!(pipeline.library().is_empty());
        assert_eq!(pipeline.library().pending_len(), 0);
    }

    #[test]
    fn empty_classifier_output_is_an_error() {
        let img = frame();
        let mut pipeline = BannerPipeline::new(Silent, PipelineParams::default());
        let out = pipeline.process_frame(&img.view(), &[obs(0.1, 0.1, 0.4, 0.5)]);
        assert!(matches!(
            out[0],
            DetectionOutcome::Failed {
                error: PipelineError::NoClassification,
                ..
            }
        ));
        assert_eq!(pipeline.library().pending_len(), 0);
    }

    #[test]
    fn unlabelled_images_are_discarded_and_labels_hit_the_new_image() {
        let img = frame();
        let mut silent = BannerPipeline::new(Silent, PipelineParams::default());
        silent.process_frame(&img.view(), &[obs(0.1, 0.1, 0.4, 0.5)]);
        assert_eq!(silent.library().pending_len(), 0);

        let mut pipeline = BannerPipeline::new(Brightness, PipelineParams::default());
        pipeline.library_mut().push_pending(ReferenceImage::new(Image::new(2, 2, 1), 0.2));
        let out = pipeline.process_frame(&img.view(), &[obs(0.1, 0.1, 0.4, 0.5)]);
        assert_eq!(out[0].label(), Some("bright"));
        // The label goes to the image rectified in this frame.
        assert_eq!(pipeline.library().get("bright").map(|r| r.image.width), Some(24));
        assert_eq!(pipeline.library().pending_len(), 1);
    }

    #[test]
    fn params_fill_defaults_from_json() {
        let params: PipelineParams =
            serde_json::from_str(r#"{"min_confidence": 0.8}"#).expect("parse");
        assert_eq!(params.rectify.orientation, Orientation::Right);
        assert!((params.physical_width_m - 0.2).abs() < 1e-6);
        assert!((params.min_confidence - 0.8).abs() < 1e-6);
    }
}

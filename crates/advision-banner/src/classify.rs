//! Seam to the image classifier that names a rectified banner.

use advision_core::ImageView;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// One label with its confidence in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub identifier: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(identifier: impl Into<String>, confidence: f32) -> Self {
        Self {
            identifier: identifier.into(),
            confidence,
        }
    }
}

/// Anything that can label a rectified image.
///
/// Plain functions and closures returning a `Vec<Classification>` implement
/// this with an infallible error type.
pub trait Classifier {
    type Error: std::error::Error + Send + Sync + 'static;

    fn classify(&self, image: &ImageView<'_>) -> Result<Vec<Classification>, Self::Error>;
}

impl<F> Classifier for F
where
    F: Fn(&ImageView<'_>) -> Vec<Classification>,
{
    type Error = Infallible;

    fn classify(&self, image: &ImageView<'_>) -> Result<Vec<Classification>, Self::Error> {
        Ok(self(image))
    }
}

/// Highest-confidence result; NaN confidences never win.
pub fn best_classification(results: &[Classification]) -> Option<&Classification> {
    results
        .iter()
        .filter(|c| !c.confidence.is_nan())
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use advision_core::Image;

    #[test]
    fn best_ignores_order_and_nan() {
        let results = vec![
            Classification::new("tele2", 0.2),
            Classification::new("beeline", f32::NAN),
            Classification::new("megafon", 0.7),
            Classification::new("mts", 0.1),
        ];
        assert_eq!(
            best_classification(&results).map(|c| c.identifier.as_str()),
            Some("megafon")
        );
        assert!(best_classification(&[]).is_none());
    }

    #[test]
    fn functions_are_classifiers() {
        fn by_width(img: &ImageView<'_>) -> Vec<Classification> {
            vec![Classification::new(format!("w{}", img.width), 1.0)]
        }
        let img = Image::new(7, 2, 1);
        let out = by_width.classify(&img.view()).expect("infallible");
        assert_eq!(out[0].identifier, "w7");
    }
}

//! Rectified banners kept as reference images for the tracker.
//!
//! A freshly rectified image is pushed as *pending*. When its
//! classification arrives, the most recent pending image is named and moves
//! into the named set, replacing any earlier image with the same name.

use advision_core::{Image, Size};
use std::collections::BTreeMap;

/// Physical width assumed for a banner when none is known.
pub const DEFAULT_PHYSICAL_WIDTH_M: f32 = 0.2;

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceImage {
    pub name: Option<String>,
    /// Printed width of the banner in meters.
    pub physical_width_m: f32,
    pub image: Image,
}

impl ReferenceImage {
    pub fn new(image: Image, physical_width_m: f32) -> Self {
        Self {
            name: None,
            physical_width_m,
            image,
        }
    }

    /// Physical size in meters; the height follows the pixel aspect ratio.
    pub fn physical_size(&self) -> Size {
        let aspect = if self.image.width == 0 {
            0.0
        } else {
            self.image.height as f32 / self.image.width as f32
        };
        Size::new(self.physical_width_m, self.physical_width_m * aspect)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReferenceLibrary {
    pending: Vec<ReferenceImage>,
    named: BTreeMap<String, ReferenceImage>,
}

impl ReferenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pending(&mut self, image: ReferenceImage) {
        self.pending.push(image);
    }

    /// Name the most recent pending image and store it. Returns the previous
    /// image stored under that name, or `None`. Does nothing when no image is
    /// pending.
    pub fn label_latest(&mut self, name: &str) -> Option<ReferenceImage> {
        let mut image = self.pending.pop()?;
        image.name = Some(name.to_string());
        log::info!("reference image labelled {name:?}");
        self.named.insert(name.to_string(), image)
    }

    pub fn latest_pending(&self) -> Option<&ReferenceImage> {
        self.pending.last()
    }

    /// Drop the most recent pending image without naming it.
    pub fn discard_latest(&mut self) -> Option<ReferenceImage> {
        self.pending.pop()
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceImage> {
        self.named.get(name)
    }

    pub fn iter_named(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.named.values()
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.named.clear();
    }
}

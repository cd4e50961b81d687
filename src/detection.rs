use ndarray::ArrayView1;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::category::{self, Category};
use crate::error::{Error, Result};

/// One decoded detector row; box corners are normalized to the frame size.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    #[serde(rename = "c")]
    pub class: i32,
    #[serde(rename = "p")]
    pub confidence: f32,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Detection {
    pub const ROW_LEN: usize = 7;

    /// Reads a `[batch, class, confidence, left, top, right, bottom]` row.
    #[inline]
    pub fn from_row(row: ArrayView1<'_, f32>) -> Self {
        Self {
            class: row[1] as i32,
            confidence: row[2],
            left: row[3],
            top: row[4],
            right: row[5],
            bottom: row[6],
        }
    }

    #[inline(always)]
    pub fn category(&self) -> Category {
        category::classify(self.class)
    }

    /// Scales the normalized corners to pixels, truncating toward zero.
    ///
    /// Corners are clamped to the frame; a non-finite corner gives `None`.
    pub fn bbox(&self, dims: (u32, u32)) -> Option<BBox> {
        let corners = [self.left, self.top, self.right, self.bottom];
        if corners.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let (w, h) = (dims.0 as f64, dims.1 as f64);
        let scale = |v: f32, size: f64| (v.clamp(0.0, 1.0) as f64 * size) as i32;

        Some(BBox::ltrb(
            scale(self.left, w),
            scale(self.top, h),
            scale(self.right, w),
            scale(self.bottom, h),
        ))
    }

    /// Validated observation built from this row.
    pub fn observation(&self, dims: (u32, u32)) -> Result<Observation> {
        let bbox = self.bbox(dims).ok_or_else(|| {
            Error::InvalidObservation(format!(
                "non-finite box corners {:?}",
                [self.left, self.top, self.right, self.bottom]
            ))
        })?;

        Observation::new(self.category(), self.confidence, bbox)
    }
}

/// A fresh, validated per-frame detection of a tracked category.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    category: Category,
    confidence: f32,
    bbox: BBox,
}

impl Observation {
    pub fn new(category: Category, confidence: f32, bbox: BBox) -> Result<Self> {
        if !category.is_tracked() {
            return Err(Error::UntrackedCategory(category));
        }

        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidObservation(format!(
                "confidence {} outside [0, 1]",
                confidence
            )));
        }

        if bbox.width() <= 0 || bbox.height() <= 0 {
            return Err(Error::InvalidObservation(format!(
                "degenerate box {:?}",
                bbox.as_slice()
            )));
        }

        Ok(Self {
            category,
            confidence,
            bbox,
        })
    }

    #[inline(always)]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline(always)]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    #[inline(always)]
    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }
}

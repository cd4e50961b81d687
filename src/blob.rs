use serde_derive::Serialize;

use crate::bbox::BBox;
use crate::category::Category;
use crate::detection::Observation;
use crate::rolling_avg::RollingAvg;

/// A remembered object, kept alive across frames by decay and merges.
#[derive(Serialize, Debug, Clone)]
pub struct Blob {
    pub category: Category,
    pub confidence: f32,
    pub bbox: BBox,

    // confidence history per category, only fed by the rolling average policy
    #[serde(skip)]
    pub(crate) votes: Option<RollingAvg>,
}

impl Blob {
    #[inline]
    pub fn new(category: Category, confidence: f32, bbox: BBox) -> Self {
        Self {
            category,
            confidence,
            bbox,
            votes: None,
        }
    }
}

impl From<&Observation> for Blob {
    fn from(obs: &Observation) -> Self {
        Blob::new(obs.category(), obs.confidence(), *obs.bbox())
    }
}

impl PartialEq for Blob {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
            && self.confidence == other.confidence
            && self.bbox == other.bbox
    }
}

use ndarray::{ArrayViewD, Axis};

use crate::detection::{Detection, Observation};
use crate::error::Result;

pub struct Frame {
    pub dims: (u32, u32),
    pub detections: Vec<Detection>,
}

impl Frame {
    pub fn new(dims: (u32, u32), detections: Vec<Detection>) -> Self {
        Self { dims, detections }
    }

    /// Decodes an SSD style `1x1xNx7` output tensor.
    pub fn from_output(dims: (u32, u32), output: ArrayViewD<'_, f32>) -> Result<Self> {
        let rows = output.len() / Detection::ROW_LEN;
        let table = output.into_shape((rows, Detection::ROW_LEN))?;

        let detections = table
            .axis_iter(Axis(0))
            .map(Detection::from_row)
            .collect();

        Ok(Self { dims, detections })
    }

    /// Confident detections of tracked categories, as pixel-space observations.
    pub fn observations(&self, min_confidence: f32) -> Vec<Observation> {
        self.detections
            .iter()
            .filter(|det| det.confidence > min_confidence)
            .filter(|det| det.category().is_tracked())
            .filter_map(|det| {
                match det.observation(self.dims) {
                    Ok(obs) => Some(obs),
                    Err(err) => {
                        tracing::warn!(class = det.class, "dropping detection: {}", err);
                        None
                    }
                }
            })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

use serde_derive::{Deserialize, Serialize};

use crate::bbox::NearnessMetric;
use crate::error::{Error, Result};

/// Strategy used to settle a blob's category and confidence on merge.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClassPolicyKind {
    /// Override when the observation beats the blob by `memoryClassSwitchThreshold`.
    #[default]
    ThresholdOverride,
    /// Highest mean over the last `window` confidences seen per category.
    RollingAverage { window: usize },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryConfig {
    /// Detections at or below this confidence never reach the memory.
    pub min_confidence: f32,

    /// Blobs whose decayed confidence falls to this value are forgotten.
    pub memory_min_confidence: f32,

    /// Applied to every blob's confidence once per cycle.
    pub memory_decay_factor: f32,

    /// Minimum nearness for an observation to merge into a known blob.
    pub memory_nearness_threshold: f32,

    /// Margin an observation needs over a blob to override its class and confidence.
    pub memory_class_switch_threshold: f32,

    /// Let several observations of one cycle merge into the same blob.
    pub memory_collapse_multiple: bool,

    pub nearness_metric: NearnessMetric,
    pub class_policy: ClassPolicyKind,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.75,
            memory_min_confidence: 0.5,
            memory_decay_factor: 0.98,
            memory_nearness_threshold: 0.65,
            memory_class_switch_threshold: 0.15,
            memory_collapse_multiple: true,
            nearness_metric: NearnessMetric::default(),
            class_policy: ClassPolicyKind::default(),
        }
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field,
            value: value as f64,
            reason: "must be within [0, 1]",
        })
    }
}

impl MemoryConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: MemoryConfig = serde_json::from_str(text)?;
        cfg.validate()?;

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        unit_interval("minConfidence", self.min_confidence)?;
        unit_interval("memoryMinConfidence", self.memory_min_confidence)?;
        unit_interval("memoryNearnessThreshold", self.memory_nearness_threshold)?;
        unit_interval(
            "memoryClassSwitchThreshold",
            self.memory_class_switch_threshold,
        )?;

        let decay = self.memory_decay_factor;
        if !(decay.is_finite() && decay > 0.0 && decay <= 1.0) {
            return Err(Error::InvalidConfig {
                field: "memoryDecayFactor",
                value: decay as f64,
                reason: "must be within (0, 1]",
            });
        }

        if let ClassPolicyKind::RollingAverage { window: 0 } = self.class_policy {
            return Err(Error::InvalidConfig {
                field: "classPolicy.window",
                value: 0.0,
                reason: "must be at least 1",
            });
        }

        Ok(())
    }
}

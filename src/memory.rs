use std::collections::HashSet;

use crate::bbox::NearnessMetric;
use crate::blob::Blob;
use crate::category::Category;
use crate::config::MemoryConfig;
use crate::detection::Observation;
use crate::error::Result;
use crate::policy::{self, ClassPolicy};

/// The set of blobs remembered for one video source.
#[derive(Debug)]
pub struct BlobMemory {
    blobs: Vec<Blob>,
    min_confidence: f32,
    decay_factor: f32,
    nearness_threshold: f32,
    collapse_multiple: bool,
    metric: NearnessMetric,
    policy: Box<dyn ClassPolicy>,
}

impl BlobMemory {
    pub fn new(cfg: &MemoryConfig) -> Result<Self> {
        cfg.validate()?;

        Ok(Self {
            blobs: Vec::new(),
            min_confidence: cfg.memory_min_confidence,
            decay_factor: cfg.memory_decay_factor,
            nearness_threshold: cfg.memory_nearness_threshold,
            collapse_multiple: cfg.memory_collapse_multiple,
            metric: cfg.nearness_metric,
            policy: policy::from_kind(cfg.class_policy, cfg.memory_class_switch_threshold),
        })
    }

    /// Runs one cycle: decay, then associate and merge every observation.
    ///
    /// Returns `true` when a blob was created or changed category.
    pub fn update(&mut self, observations: &[Observation]) -> bool {
        let mut changed = false;
        let mut merged = HashSet::new();

        self.decay();

        for obs in observations {
            match self.find_nearest(obs, &merged) {
                Some(idx) => {
                    if self.merge_at(idx, obs) {
                        changed = true;
                    }

                    if !self.collapse_multiple {
                        merged.insert(idx);
                    }
                }
                None => {
                    let mut blob = Blob::from(obs);
                    self.policy.on_create(&mut blob, obs);

                    tracing::debug!(
                        index = self.blobs.len(),
                        category = %blob.category,
                        confidence = blob.confidence,
                        "new blob"
                    );

                    self.blobs.push(blob);
                    changed = true;
                }
            }
        }

        changed
    }

    fn decay(&mut self) {
        let factor = self.decay_factor;
        let floor = self.min_confidence;

        self.blobs.retain_mut(|blob| {
            blob.confidence *= factor;

            if blob.confidence > floor {
                true
            } else {
                tracing::debug!(category = %blob.category, confidence = blob.confidence, "blob forgotten");
                false
            }
        });
    }

    /// Index of the closest blob above the nearness threshold that has not
    /// been claimed this cycle. The lowest index wins a tie.
    fn find_nearest(&self, obs: &Observation, merged: &HashSet<usize>) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;

        for (idx, blob) in self.blobs.iter().enumerate() {
            if merged.contains(&idx) {
                continue;
            }

            let score = self.metric.score(obs.bbox(), &blob.bbox);
            if score > self.nearness_threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, _)| idx)
    }

    fn merge_at(&mut self, idx: usize, obs: &Observation) -> bool {
        let blob = &mut self.blobs[idx];
        let before = blob.category;

        let changed = self.policy.merge(blob, obs);
        if changed {
            tracing::debug!(index = idx, from = %before, to = %blob.category, "blob category switched");
        }

        blob.bbox = blob.bbox.midpoint(obs.bbox());

        changed
    }

    #[inline]
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.blobs.clear()
    }

    /// Number of blobs, optionally only those whose category label matches
    /// `label` case-insensitively. Unknown labels count nothing.
    pub fn count_by_label(&self, label: Option<&str>) -> usize {
        match label {
            None => self.blobs.len(),
            Some(label) => match label.parse::<Category>() {
                Ok(cat) => self.blobs.iter().filter(|b| b.category == cat).count(),
                Err(_) => 0,
            },
        }
    }
}

//! Strategies deciding a blob's category and confidence when an observation
//! merges into it. Box smoothing is not their concern.

use std::fmt;

use crate::blob::Blob;
use crate::config::ClassPolicyKind;
use crate::detection::Observation;
use crate::rolling_avg::RollingAvg;

pub trait ClassPolicy: fmt::Debug {
    /// Called once for a blob created from `obs`.
    fn on_create(&self, _blob: &mut Blob, _obs: &Observation) {}

    /// Folds `obs` into `blob`, returns `true` when the category changed.
    fn merge(&self, blob: &mut Blob, obs: &Observation) -> bool;
}

pub fn from_kind(kind: ClassPolicyKind, switch_threshold: f32) -> Box<dyn ClassPolicy> {
    match kind {
        ClassPolicyKind::ThresholdOverride => Box::new(ThresholdOverride { switch_threshold }),
        ClassPolicyKind::RollingAverage { window } => Box::new(RollingAverage { window }),
    }
}

/// An observation at least `switch_threshold` more confident than the blob
/// replaces both its confidence and category.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdOverride {
    pub switch_threshold: f32,
}

impl ClassPolicy for ThresholdOverride {
    fn merge(&self, blob: &mut Blob, obs: &Observation) -> bool {
        if obs.confidence() < blob.confidence + self.switch_threshold {
            return false;
        }

        let changed = blob.category != obs.category();
        blob.confidence = obs.confidence();
        blob.category = obs.category();

        changed
    }
}

/// Category with the best mean confidence over the last `window` observations wins.
#[derive(Debug, Clone, Copy)]
pub struct RollingAverage {
    pub window: usize,
}

impl ClassPolicy for RollingAverage {
    fn on_create(&self, blob: &mut Blob, obs: &Observation) {
        let mut votes = RollingAvg::new(self.window);
        votes.push(obs.category(), obs.confidence());
        blob.votes = Some(votes);
    }

    fn merge(&self, blob: &mut Blob, obs: &Observation) -> bool {
        let votes = blob
            .votes
            .get_or_insert_with(|| RollingAvg::new(self.window));
        votes.push(obs.category(), obs.confidence());

        let Some((winner, mean)) = votes.winner() else {
            return false;
        };

        let changed = blob.category != winner;
        blob.category = winner;
        blob.confidence = blob.confidence.max(mean);

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::category::Category;
    use approx::assert_relative_eq;

    fn obs(category: Category, confidence: f32) -> Observation {
        Observation::new(category, confidence, BBox::ltrb(0, 0, 10, 10)).unwrap()
    }

    #[test]
    fn override_boundary_is_inclusive() {
        let policy = ThresholdOverride {
            switch_threshold: 0.25,
        };

        let mut blob = Blob::new(Category::Human, 0.5, BBox::ltrb(0, 0, 10, 10));
        assert!(policy.merge(&mut blob, &obs(Category::Animal, 0.75)));
        assert_eq!(blob.category, Category::Animal);
        assert_relative_eq!(blob.confidence, 0.75);
    }

    #[test]
    fn override_below_boundary_keeps_blob() {
        let policy = ThresholdOverride {
            switch_threshold: 0.25,
        };

        let mut blob = Blob::new(Category::Human, 0.5, BBox::ltrb(0, 0, 10, 10));
        assert!(!policy.merge(&mut blob, &obs(Category::Animal, 0.7499)));
        assert_eq!(blob.category, Category::Human);
        assert_relative_eq!(blob.confidence, 0.5);
    }

    #[test]
    fn same_category_override_is_not_a_change() {
        let policy = ThresholdOverride {
            switch_threshold: 0.1,
        };

        let mut blob = Blob::new(Category::Human, 0.5, BBox::ltrb(0, 0, 10, 10));
        assert!(!policy.merge(&mut blob, &obs(Category::Human, 0.9)));
        assert_relative_eq!(blob.confidence, 0.9);
    }

    #[test]
    fn rolling_average_switches_on_sustained_evidence() {
        let policy = RollingAverage { window: 3 };

        let first = obs(Category::Human, 0.8);
        let mut blob = Blob::from(&first);
        policy.on_create(&mut blob, &first);

        assert!(!policy.merge(&mut blob, &obs(Category::Animal, 0.78)));
        assert_eq!(blob.category, Category::Human);

        assert!(policy.merge(&mut blob, &obs(Category::Animal, 0.95)));
        assert_eq!(blob.category, Category::Animal);
        assert_relative_eq!(blob.confidence, 0.865, epsilon = 1e-6);
    }

    #[test]
    fn rolling_average_never_lowers_confidence() {
        let policy = RollingAverage { window: 4 };

        let first = obs(Category::Human, 0.9);
        let mut blob = Blob::from(&first);
        policy.on_create(&mut blob, &first);

        assert!(!policy.merge(&mut blob, &obs(Category::Human, 0.5)));
        assert_relative_eq!(blob.confidence, 0.9);
    }
}

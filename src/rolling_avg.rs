use crate::category::Category;
use crate::circular_queue::CircularQueue;

/// Per-category window of the most recent confidences seen for one blob.
#[derive(Debug, Clone)]
pub struct RollingAvg {
    window: usize,
    history: Vec<(Category, CircularQueue<f32>)>,
}

impl RollingAvg {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            history: Vec::new(),
        }
    }

    pub fn push(&mut self, category: Category, confidence: f32) {
        let window = self.window;

        match self.history.iter_mut().find(|(c, _)| *c == category) {
            Some((_, queue)) => {
                queue.push(confidence);
            }
            None => {
                let mut queue = CircularQueue::with_capacity(window);
                queue.push(confidence);
                self.history.push((category, queue));
            }
        }
    }

    #[inline]
    pub fn mean(&self, category: Category) -> Option<f32> {
        self.history
            .iter()
            .find(|(c, _)| *c == category)
            .and_then(|(_, q)| q.mean())
    }

    /// Category with the highest mean; the first one seen wins a tie.
    pub fn winner(&self) -> Option<(Category, f32)> {
        let mut best: Option<(Category, f32)> = None;

        for (category, queue) in &self.history {
            if let Some(mean) = queue.mean() {
                if best.map_or(true, |(_, m)| mean > m) {
                    best = Some((*category, mean));
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_has_no_winner() {
        assert_eq!(RollingAvg::new(4).winner(), None);
    }

    #[test]
    fn winner_by_mean_not_by_last_value() {
        let mut avg = RollingAvg::new(4);
        avg.push(Category::Human, 0.9);
        avg.push(Category::Human, 0.8);
        avg.push(Category::Animal, 0.86);

        let (cat, mean) = avg.winner().unwrap();
        assert_eq!(cat, Category::Animal);
        assert_relative_eq!(mean, 0.86);

        avg.push(Category::Animal, 0.7);
        let (cat, mean) = avg.winner().unwrap();
        assert_eq!(cat, Category::Human);
        assert_relative_eq!(mean, 0.85, epsilon = 1e-6);
    }

    #[test]
    fn window_forgets_old_values() {
        let mut avg = RollingAvg::new(2);
        avg.push(Category::Human, 0.1);
        avg.push(Category::Human, 0.9);
        avg.push(Category::Human, 0.9);

        assert_relative_eq!(avg.mean(Category::Human).unwrap(), 0.9);
        assert_eq!(avg.mean(Category::Animal), None);
    }
}

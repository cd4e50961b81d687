use std::collections::VecDeque;

/// Fixed capacity queue, newest item first; pushing into a full queue drops the oldest.
#[derive(Debug, Clone)]
pub struct CircularQueue<T> {
    deque: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularQueue<T> {
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            deque: VecDeque::with_capacity(cap),
            capacity: cap,
        }
    }

    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.deque.pop_back()
        } else {
            None
        };

        self.deque.push_front(item);

        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.deque.len() >= self.capacity
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'_ T> {
        self.deque.iter()
    }
}

impl CircularQueue<f32> {
    pub fn mean(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        Some(self.iter().sum::<f32>() / self.len() as f32)
    }
}

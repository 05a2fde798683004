use std::collections::VecDeque;

/// A fixed capacity log of recent values. Pushing to a full buffer evicts the oldest value.
///
/// ```rust
/// use nsdf_pitch::history::HistoryBuffer;
///
/// let mut history = HistoryBuffer::new(3);
/// for value in 1..=5 {
///     history.push(value);
/// }
/// assert_eq!(history.to_vec(), vec![3, 4, 5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "History capacity must be greater than 0");
        HistoryBuffer {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `value`, evicting the oldest value if the buffer is full.
    pub fn push(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The stored values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }

    /// The most recently pushed value.
    pub fn last(&self) -> Option<&T> {
        self.values.back()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Copies the stored values, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

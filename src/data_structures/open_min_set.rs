// Heap layout and swim/sink follow Sedgewick, "Algorithms" (4th ed.), section 2.4.

use std::collections::HashMap;
use std::hash::Hash;

/// A binary min-heap over elements with externally tracked scores, plus a
/// reverse index from each element to its slot in the heap.
///
/// The reverse index is what makes arbitrary elements addressable: membership is
/// O(1), and [decrease_key](OpenMinSet::decrease_key),
/// [increase_key](OpenMinSet::increase_key) and [remove](OpenMinSet::remove)
/// are O(log n) instead of a linear scan.
///
/// Lower scores come out first. Scores only need [PartialOrd]; a score that
/// can't be compared with itself (e.g. `f64::NAN`) is rejected on insert, since it
/// would silently corrupt the heap order.
///
/// # Example
/// ```rust
/// use graph_pathfinding::data_structures::OpenMinSet;
///
/// let mut open = OpenMinSet::new();
/// open.push("a", 5.0);
/// open.push("b", 3.0);
/// open.push("c", 4.0);
///
/// open.decrease_key(&"a", 1.0);
/// assert_eq!(open.pop(), Some("a"));
///
/// assert_eq!(open.remove(&"c"), Some(4.0));
/// assert_eq!(open.pop_with_score(), Some(("b", 3.0)));
/// assert!(open.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct OpenMinSet<T, S> {
    heap: Vec<T>,
    scores: HashMap<T, S>,
    positions: HashMap<T, usize>,
}

impl<T, S> Default for OpenMinSet<T, S> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            scores: HashMap::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T, S> OpenMinSet<T, S>
where
    T: Eq + Hash + Clone,
    S: PartialOrd + Copy,
{
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty set with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            scores: HashMap::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Builds a set from `(element, score)` pairs in O(n) using bottom-up
    /// heap construction.
    ///
    /// Panics if an element appears twice or a score is not comparable.
    pub fn from_scores<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
    {
        let items = items.into_iter();
        let mut set = Self::with_capacity(items.size_hint().0);

        for (element, score) in items {
            assert_comparable(&score);
            assert!(
                !set.contains(&element),
                "OpenMinSet::from_scores: element appears more than once"
            );
            set.positions.insert(element.clone(), set.heap.len());
            set.scores.insert(element.clone(), score);
            set.heap.push(element);
        }

        for index in (0..set.heap.len() / 2).rev() {
            set.sink(index);
        }

        set
    }

    /// The number of queued elements.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the set has no queued elements.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Inserts `element` with priority `score`. O(log n)
    ///
    /// Panics if `element` is already queued; use
    /// [contains](OpenMinSet::contains) and [decrease_key](OpenMinSet::decrease_key)
    /// to update an existing entry instead.
    pub fn push(&mut self, element: T, score: S) {
        assert_comparable(&score);
        assert!(
            !self.contains(&element),
            "OpenMinSet::push: element is already queued"
        );

        let index = self.heap.len();
        self.scores.insert(element.clone(), score);
        self.positions.insert(element.clone(), index);
        self.heap.push(element);
        self.swim(index);
    }

    /// Removes and returns the element with the lowest score. O(log n)
    pub fn pop(&mut self) -> Option<T> {
        self.pop_with_score().map(|(element, _)| element)
    }

    /// Removes and returns the element with the lowest score, along with that score. O(log n)
    pub fn pop_with_score(&mut self) -> Option<(T, S)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let element = self.heap.pop()?;
        let score = self.detach(&element);

        if !self.heap.is_empty() {
            self.sink(0);
        }

        Some((element, score))
    }

    /// Returns the element with the lowest score without removing it. O(1)
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Returns the element with the lowest score and its score without removing it. O(1)
    pub fn peek_with_score(&self) -> Option<(&T, S)> {
        self.heap.first().map(|element| (element, self.scores[element]))
    }

    /// Whether `element` is currently queued. O(1)
    pub fn contains(&self, element: &T) -> bool {
        self.positions.contains_key(element)
    }

    /// The current score of `element`, if it is queued. O(1)
    pub fn score(&self, element: &T) -> Option<S> {
        self.scores.get(element).copied()
    }

    /// Lowers the score of a queued element and moves it towards the root. O(log n)
    ///
    /// Panics if `element` is not queued or if `score` is greater than its
    /// current score.
    pub fn decrease_key(&mut self, element: &T, score: S) {
        let index = self.position_of(element, "decrease_key");
        let current = self.scores[element];
        assert!(
            score <= current,
            "OpenMinSet::decrease_key: new score is greater than the current score"
        );

        if let Some(entry) = self.scores.get_mut(element) {
            *entry = score;
        }
        self.swim(index);
    }

    /// Raises the score of a queued element. O(log n)
    ///
    /// This is a [remove](OpenMinSet::remove) followed by a
    /// [push](OpenMinSet::push), so among equal scores the element is treated as
    /// the most recently inserted one.
    ///
    /// Panics if `element` is not queued or if `score` is less than its current score.
    pub fn increase_key(&mut self, element: &T, score: S) {
        self.position_of(element, "increase_key");
        let current = self.scores[element];
        assert!(
            score >= current,
            "OpenMinSet::increase_key: new score is less than the current score"
        );

        self.remove(element);
        self.push(element.clone(), score);
    }

    /// Removes an arbitrary element, returning its score, or None if it wasn't queued. O(log n)
    pub fn remove(&mut self, element: &T) -> Option<S> {
        let index = *self.positions.get(element)?;

        let last = self.heap.len() - 1;
        self.swap(index, last);
        let removed = self.heap.pop()?;
        let score = self.detach(&removed);

        // The element moved into `index` may be out of order with either its
        // new parent or its new children.
        if index < self.heap.len() {
            self.swim(index);
            self.sink(index);
        }

        Some(score)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.scores.clear();
        self.positions.clear();
    }

    /// Iterates over queued elements and their scores in heap order, which is
    /// not sorted.
    pub fn iter(&self) -> impl Iterator<Item = (&T, S)> + '_ {
        self.heap.iter().map(|element| (element, self.scores[element]))
    }

    /// Consumes the set, returning every element in pop order.
    pub fn into_sorted_vec(mut self) -> Vec<(T, S)> {
        std::iter::from_fn(|| self.pop_with_score()).collect()
    }

    fn position_of(&self, element: &T, operation: &str) -> usize {
        match self.positions.get(element) {
            Some(index) => *index,
            None => panic!("OpenMinSet::{operation}: element is not queued"),
        }
    }

    /// Drops the score and position entries of an element already taken out of `heap`.
    fn detach(&mut self, element: &T) -> S {
        self.positions.remove(element);
        match self.scores.remove(element) {
            Some(score) => score,
            None => panic!("OpenMinSet: heap element has no score entry"),
        }
    }

    /// Swaps two heap slots, keeping `positions` in step.
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }

        self.heap.swap(a, b);
        if let Some(position) = self.positions.get_mut(&self.heap[a]) {
            *position = a;
        }
        if let Some(position) = self.positions.get_mut(&self.heap[b]) {
            *position = b;
        }
    }

    fn greater(&self, a: usize, b: usize) -> bool {
        self.scores[&self.heap[a]] > self.scores[&self.heap[b]]
    }

    fn swim(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.greater(parent, index) {
                break;
            }
            self.swap(parent, index);
            index = parent;
        }
    }

    fn sink(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }

            // Ties go to the left child.
            let right = left + 1;
            let child = if right < len && self.greater(left, right) {
                right
            } else {
                left
            };

            if !self.greater(index, child) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
    }

    /// Checks the heap property and that `positions` exactly inverts `heap`.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        if self.scores.len() != self.heap.len() || self.positions.len() != self.heap.len() {
            return Err(format!(
                "size mismatch: heap {}, scores {}, positions {}",
                self.heap.len(),
                self.scores.len(),
                self.positions.len()
            ));
        }

        for (index, element) in self.heap.iter().enumerate() {
            if self.positions.get(element) != Some(&index) {
                return Err(format!("position entry for slot {index} is wrong"));
            }
            if index > 0 && self.greater((index - 1) / 2, index) {
                return Err(format!("slot {index} scores below its parent"));
            }
        }

        Ok(())
    }
}

impl<T, S> FromIterator<(T, S)> for OpenMinSet<T, S>
where
    T: Eq + Hash + Clone,
    S: PartialOrd + Copy,
{
    fn from_iter<I: IntoIterator<Item = (T, S)>>(iter: I) -> Self {
        Self::from_scores(iter)
    }
}

impl<T, S> Extend<(T, S)> for OpenMinSet<T, S>
where
    T: Eq + Hash + Clone,
    S: PartialOrd + Copy,
{
    fn extend<I: IntoIterator<Item = (T, S)>>(&mut self, iter: I) {
        for (element, score) in iter {
            self.push(element, score);
        }
    }
}

fn assert_comparable<S: PartialOrd>(score: &S) {
    assert!(
        score.partial_cmp(score).is_some(),
        "OpenMinSet: score is not comparable with itself (NaN?)"
    );
}

//! Bounded recent-history trail of source positions.

use nalgebra::Vector3;
use std::collections::VecDeque;

/// Number of positions retained for the fading trail.
pub const TRAIL_CAPACITY: usize = 40;

/// FIFO buffer of recent source positions.
///
/// Pushing past capacity evicts the oldest point. Consecutive identical
/// points are retained as-is; there is no deduplication.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<Vector3<f64>>,
    capacity: usize,
}

impl TrailBuffer {
    /// Creates a trail with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(TRAIL_CAPACITY)
    }

    /// Creates a trail bounded at `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a point, evicting the oldest beyond capacity.
    pub fn push(&mut self, point: Vector3<f64>) {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Empties the trail. Called on loop wraparound and explicit seek.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// The retained points in push order, oldest first.
    pub fn snapshot(&self) -> Vec<Vector3<f64>> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_bound() {
        let mut trail = TrailBuffer::new();
        for i in 0..100 {
            trail.push(Vector3::new(i as f64, 0.0, 0.0));
        }

        let snapshot = trail.snapshot();
        assert_eq!(snapshot.len(), TRAIL_CAPACITY);

        // The 40 most recently pushed points, in push order
        assert_eq!(snapshot[0].x, 60.0);
        assert_eq!(snapshot[39].x, 99.0);
    }

    #[test]
    fn test_clear_empties() {
        let mut trail = TrailBuffer::new();
        for _ in 0..10 {
            trail.push(Vector3::zeros());
        }
        assert_eq!(trail.len(), 10);

        trail.clear();
        assert!(trail.is_empty());
        assert!(trail.snapshot().is_empty());
    }

    #[test]
    fn test_duplicates_retained() {
        let mut trail = TrailBuffer::new();
        let point = Vector3::new(1.0, 2.0, 3.0);
        trail.push(point);
        trail.push(point);
        assert_eq!(trail.len(), 2);
    }
}

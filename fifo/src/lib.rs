/// Bounded first-in first-out window.
///
/// Once `capacity` elements are stored, every push drops the oldest one.
/// The last element is the one added last.
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct FIFO<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> FIFO<T> {
    pub fn new(nelem: usize) -> Self {
        FIFO {
            data: VecDeque::with_capacity(nelem),
            capacity: nelem,
        }
    }

    pub fn push(&mut self, elem: T) {
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        if self.capacity > 0 {
            self.data.push_back(elem);
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    pub fn last(&self) -> Option<&T> {
        self.data.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T: Clone> FIFO<T> {
    /// A window already filled with `elem`.
    pub fn filled(nelem: usize, elem: T) -> Self {
        let mut fq = FIFO::new(nelem);
        for _ in 0..nelem {
            fq.push(elem.clone());
        }
        fq
    }
}

impl<T> std::ops::Index<usize> for FIFO<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}

#[test]
fn test_fifo_rollover_preserves_order() {
    let mut fq = FIFO::<i32>::new(3);

    assert!(fq.is_empty());

    for v in 0..6 {
        fq.push(v);
    }

    assert!(fq.is_full());
    assert_eq!(fq.len(), 3);
    assert_eq!(fq[0], 3);
    assert_eq!(fq[1], 4);
    assert_eq!(fq[2], 5);
    assert_eq!(fq.last(), Some(&5));
}

#[test]
fn test_fifo_filled_window() {
    let mut fq = FIFO::filled(4, true);

    assert!(fq.is_full());
    assert!(fq.iter().all(|&b| b));

    fq.push(false);

    assert_eq!(fq.len(), 4);
    assert!(!fq.iter().all(|&b| b));

    for _ in 0..3 {
        fq.push(true);
    }
    assert!(!fq.iter().all(|&b| b));

    fq.push(true);
    assert!(fq.iter().all(|&b| b));
}

#[test]
fn test_fifo_last_when_empty() {
    let fq = FIFO::<i32>::new(2);
    assert_eq!(fq.last(), None);
}

//! # Sketch Queue
//!
//! A sketch is a program *template*: a sequence of statement kinds with no
//! operands assigned yet. The queue starts with the minimal sketch
//! `[Match, Return]` and grows breadth-first, one dequeue at a time
//! (spec §4.3).

use std::collections::VecDeque;

/// The kind of an IDL statement, with operands erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Match,
    Require,
    Return,
}

/// A program template: a sequence of statement kinds.
pub type Sketch = Vec<StatementKind>;

/// FIFO frontier of sketches, seeded with `[Match, Return]` and expanded
/// after each sketch is fully explored without a winner.
#[derive(Debug, Clone)]
pub struct SketchQueue {
    queue: VecDeque<Sketch>,
    dequeue_count: usize,
}

impl SketchQueue {
    /// A fresh queue seeded with the minimal sketch.
    pub fn new() -> Self {
        SketchQueue {
            queue: VecDeque::from([vec![StatementKind::Match, StatementKind::Return]]),
            dequeue_count: 0,
        }
    }

    /// Number of sketches dequeued so far via [`SketchQueue::dequeue`].
    pub fn dequeue_count(&self) -> usize {
        self.dequeue_count
    }

    /// Pop the next sketch to explore, if any remain.
    pub fn dequeue(&mut self) -> Option<Sketch> {
        let sketch = self.queue.pop_front()?;
        self.dequeue_count += 1;
        Some(sketch)
    }

    /// Enqueue the two expansions of `sketch` described in spec §4.3:
    /// inserting a `Require` before the trailing `Return`, and prepending
    /// a leading `Match`.
    pub fn expand(&mut self, sketch: &Sketch) {
        self.queue.push_back(insert_require_before_return(sketch));
        self.queue.push_back(prepend_match(sketch));
    }
}

impl Default for SketchQueue {
    fn default() -> Self {
        SketchQueue::new()
    }
}

fn insert_require_before_return(sketch: &Sketch) -> Sketch {
    let mut expanded = sketch[..sketch.len() - 1].to_vec();
    expanded.push(StatementKind::Require);
    expanded.push(StatementKind::Return);
    expanded
}

fn prepend_match(sketch: &Sketch) -> Sketch {
    let mut expanded = vec![StatementKind::Match];
    expanded.extend_from_slice(sketch);
    expanded
}

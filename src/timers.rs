// Pending timer events for the single-threaded tick loop.
//
// Timers are ordered by `(tick, sequence)`: the due tick first, then the order
// in which they were scheduled. Events carry a typed payload instead of a
// callback; the session decides what each one means when it pops out.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// What should happen when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Death sequence `epoch` moves from dying to fading.
    BeginFade { epoch: u64 },
    /// One opacity decrement for death sequence `epoch`.
    FadeTick { epoch: u64 },
    /// Death sequence `epoch` ends and a new agent appears.
    Respawn { epoch: u64 },
    /// Refresh the status snapshot read by the presentation layer.
    PresentationRefresh,
}

#[derive(Clone, Debug)]
pub struct TimerEvent {
    pub tick: u64,
    pub sequence: u64,
    pub kind: TimerKind,
}

// Min-heap on (tick, sequence): BinaryHeap is a max-heap, so compare reversed.
impl PartialEq for TimerEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.sequence == other.sequence
    }
}

impl Eq for TimerEvent {}

impl PartialOrd for TimerEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .tick
            .cmp(&self.tick)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<TimerEvent>,
    next_sequence: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, tick: u64, kind: TimerKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(TimerEvent {
            tick,
            sequence,
            kind,
        });
    }

    /// Pop the next event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<TimerEvent> {
        if self.heap.peek().is_some_and(|e| e.tick <= now) {
            self.heap.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
impl TimerQueue {
    pub fn peek_tick(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.tick)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn count_matching(&self, pred: impl Fn(&TimerKind) -> bool) -> usize {
        self.heap.iter().filter(|e| pred(&e.kind)).count()
    }
}

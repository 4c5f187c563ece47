//! Deferred task queue for the single-threaded game loop.
//!
//! Delays (pair reveal, shake animation, win flash) are queued here instead of
//! running on timers. Every task carries the generation of the session that
//! queued it; the owner pumps due tasks and must discard any whose generation
//! no longer matches the live session. `cancel_generation` drops them eagerly
//! when a session is replaced.

/// Work a session asked to run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Compare the two pending cards.
    Resolve,
    /// Mismatch shake step `n` (the last step turns both cards back down).
    ShakeStep(u8),
    /// Win flash step `n`.
    WinFlash(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub due_ms: u64,
    pub generation: u32,
    pub kind: Deferred,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms as u64);
    }

    pub fn schedule(&mut self, generation: u32, delay_ms: u32, kind: Deferred) {
        let task = Task {
            due_ms: self.now_ms.saturating_add(delay_ms as u64),
            generation,
            kind,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        tracing::trace!(generation, delay_ms, ?kind, "scheduled");
        self.queue.push(task);
    }

    /// Remove and return the earliest task that is due, in (due, insertion) order.
    pub fn pop_due(&mut self) -> Option<Task> {
        let now = self.now_ms;
        self.take_first(|t| t.due_ms <= now)
    }

    /// Remove the earliest task due by `deadline_ms` and move the clock to its
    /// due time, so anything it schedules is timed from when it was due.
    ///
    /// Pump with this and finish with [`advance_to`](Self::advance_to).
    pub fn pop_due_by(&mut self, deadline_ms: u64) -> Option<Task> {
        let task = self.take_first(|t| t.due_ms <= deadline_ms)?;
        self.now_ms = self.now_ms.max(task.due_ms);
        Some(task)
    }

    /// Move the clock forward to `now_ms`; never moves it back.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Remove the earliest task of `generation` whether or not it is due,
    /// moving the clock forward to its due time.
    pub fn pop_next_for(&mut self, generation: u32) -> Option<Task> {
        let task = self.take_first(|t| t.generation == generation)?;
        self.now_ms = self.now_ms.max(task.due_ms);
        Some(task)
    }

    /// Drop every task queued by `generation`, returning how many were dropped.
    pub fn cancel_generation(&mut self, generation: u32) -> usize {
        let before = self.queue.len();
        self.queue.retain(|t| t.generation != generation);
        let dropped = before - self.queue.len();
        if dropped > 0 {
            tracing::debug!(generation, dropped, "cancelled deferred tasks");
        }
        dropped
    }

    pub fn pending(&self, generation: u32) -> usize {
        self.queue
            .iter()
            .filter(|t| t.generation == generation)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest queued task.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.iter().map(|t| t.due_ms).min()
    }

    fn take_first(&mut self, mut pred: impl FnMut(&Task) -> bool) -> Option<Task> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| pred(t))
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)?;
        Some(self.queue.swap_remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_due_before_delay() {
        let mut s = Scheduler::new();
        s.schedule(1, 400, Deferred::Resolve);
        assert!(s.pop_due().is_none());
        s.advance(399);
        assert!(s.pop_due().is_none());
        s.advance(1);
        let task = s.pop_due().unwrap();
        assert_eq!(task.kind, Deferred::Resolve);
        assert_eq!(task.generation, 1);
        assert!(s.is_empty());
    }

    #[test]
    fn due_order_then_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(1, 70, Deferred::ShakeStep(2));
        s.schedule(1, 0, Deferred::ShakeStep(0));
        s.schedule(1, 0, Deferred::ShakeStep(1));
        s.advance(100);
        let order: Vec<_> = std::iter::from_fn(|| s.pop_due()).map(|t| t.kind).collect();
        assert_eq!(
            order,
            vec![
                Deferred::ShakeStep(0),
                Deferred::ShakeStep(1),
                Deferred::ShakeStep(2)
            ]
        );
    }

    #[test]
    fn cancel_only_touches_one_generation() {
        let mut s = Scheduler::new();
        s.schedule(1, 10, Deferred::Resolve);
        s.schedule(1, 20, Deferred::ShakeStep(1));
        s.schedule(2, 10, Deferred::Resolve);
        assert_eq!(s.cancel_generation(1), 2);
        assert_eq!(s.pending(1), 0);
        assert_eq!(s.pending(2), 1);
        assert_eq!(s.cancel_generation(1), 0);
    }

    #[test]
    fn pop_due_by_steps_clock_to_each_task() {
        let mut s = Scheduler::new();
        s.schedule(1, 400, Deferred::Resolve);
        let task = s.pop_due_by(450).unwrap();
        assert_eq!(task.kind, Deferred::Resolve);
        assert_eq!(s.now_ms(), 400);

        // Follow-ups are timed from the due time, not the end of the frame.
        s.schedule(1, 70, Deferred::ShakeStep(1));
        assert_eq!(s.next_due_ms(), Some(470));
        assert!(s.pop_due_by(450).is_none());

        s.advance_to(450);
        assert_eq!(s.now_ms(), 450);
        s.advance_to(10);
        assert_eq!(s.now_ms(), 450);
    }

    #[test]
    fn pop_next_for_fast_forwards_clock() {
        let mut s = Scheduler::new();
        s.schedule(3, 400, Deferred::Resolve);
        s.schedule(4, 10, Deferred::Resolve);
        let task = s.pop_next_for(3).unwrap();
        assert_eq!(task.due_ms, 400);
        assert_eq!(s.now_ms(), 400);
        assert!(s.pop_next_for(3).is_none());
        assert_eq!(s.next_due_ms(), Some(10));
    }
}

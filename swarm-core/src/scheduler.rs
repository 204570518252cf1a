//! Timer queue driven by an externally advanced clock.
//!
//! Every timer is tagged with the generation it was scheduled in.
//! [`TimerQueue::cancel_all`] bumps the generation and drops every pending
//! timer, and [`TimerQueue::poll`] only releases timers of the current
//! generation, so nothing scheduled before a cancel can ever fire.

use std::time::Duration;

#[derive(Debug, Clone)]
struct Timer<E> {
    due: Duration,
    generation: u64,
    /// Insertion order; keeps equal deadlines in schedule order.
    seq: u64,
    event: E,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    generation: u64,
    next_seq: u64,
    pending: Vec<Timer<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            generation: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `event` to fire once the clock reaches `due`.
    pub fn schedule(&mut self, due: Duration, event: E) {
        self.pending.push(Timer {
            due,
            generation: self.generation,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Drops every pending timer and starts a new generation.
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Removes and returns the events due at `now`, earliest first.
    pub fn poll(&mut self, now: Duration) -> Vec<E> {
        let generation = self.generation;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;

        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter()
            .filter(|t| t.generation == generation)
            .map(|t| t.event)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(300), "c");
        q.schedule(ms(100), "a");
        q.schedule(ms(200), "b");

        assert!(q.poll(ms(50)).is_empty());
        assert_eq!(q.poll(ms(250)), vec!["a", "b"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.poll(ms(1000)), vec!["c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut q = TimerQueue::new();
        for i in 0..5 {
            q.schedule(ms(0), i);
        }
        assert_eq!(q.poll(ms(0)), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancel_drops_every_pending_timer() {
        let mut q = TimerQueue::new();
        q.schedule(ms(10), 1);
        q.schedule(ms(20), 2);
        q.schedule(ms(30), 3);

        q.cancel_all();
        assert_eq!(q.generation(), 1);
        assert!(q.is_empty());

        q.schedule(ms(15), 4);
        assert_eq!(q.poll(ms(100)), vec![4]);
    }
}

/// Identifier returned by [`DelayedCalls::call`], used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelayedCallId(u64);

#[derive(Debug, Clone)]
struct PendingCall<A> {
    deadline: f64,
    id: DelayedCallId,
    action: A,
}

/// Deadline-ordered list of pending actions, advanced once per frame.
///
/// Time only moves when [`DelayedCalls::advance`] is called, so scheduling is
/// deterministic and pauses whenever the frame tick does. The clock is kept in
/// `f64` so a frame-sized step still registers after days of uptime.
#[derive(Debug, Clone)]
pub struct DelayedCalls<A> {
    now: f64,
    next_id: u64,
    pending: Vec<PendingCall<A>>,
}

impl<A> Default for DelayedCalls<A> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> DelayedCalls<A> {
    /// Run `action` once `delay` seconds have elapsed.
    pub fn call(&mut self, delay: f32, action: A) -> DelayedCallId {
        let id = DelayedCallId(self.next_id);
        self.next_id += 1;

        self.pending.push(PendingCall {
            deadline: self.now + f64::from(delay.max(0.0)),
            id,
            action,
        });
        id
    }

    /// Drop a pending call. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: DelayedCallId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|call| call.id != id);
        self.pending.len() != before
    }

    /// Drop every pending call and rewind the clock.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.now = 0.0;
    }

    pub fn is_pending(&self, id: DelayedCallId) -> bool {
        self.pending.iter().any(|call| call.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn elapsed(&self) -> f64 {
        self.now
    }

    /// Move the clock forward and return every action whose deadline has passed,
    /// earliest first; ties keep scheduling order.
    pub fn advance(&mut self, delta: f32) -> Vec<(DelayedCallId, A)> {
        self.now += f64::from(delta.max(0.0));

        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|call| call.deadline <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.deadline.total_cmp(&b.deadline).then(a.id.cmp(&b.id)));
        due.into_iter().map(|call| (call.id, call.action)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut calls = DelayedCalls::default();
        calls.call(0.3, "late");
        calls.call(0.1, "early");
        calls.call(0.1, "early-second");

        assert!(calls.advance(0.05).is_empty());

        let fired: Vec<_> = calls.advance(0.3).into_iter().map(|(_, a)| a).collect();
        assert_eq!(fired, vec!["early", "early-second", "late"]);
        assert!(calls.is_empty());
    }

    #[test]
    fn fires_exactly_once() {
        let mut calls = DelayedCalls::default();
        let id = calls.call(0.2, ());

        assert_eq!(calls.advance(0.25).len(), 1);
        assert!(!calls.is_pending(id));
        assert!(calls.advance(10.0).is_empty());
    }

    #[test]
    fn cancelled_calls_never_fire() {
        let mut calls = DelayedCalls::default();
        let keep = calls.call(0.1, 1);
        let dropped = calls.call(0.1, 2);

        assert!(calls.cancel(dropped));
        assert!(!calls.cancel(dropped));

        let fired = calls.advance(1.0);
        assert_eq!(fired, vec![(keep, 1)]);
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let mut calls = DelayedCalls::default();
        calls.advance(5.0);
        calls.call(0.5, ());

        assert!(calls.advance(0.4).is_empty());
        assert_eq!(calls.advance(0.2).len(), 1);
        assert!((calls.elapsed() - 5.6).abs() < 1e-5);
    }

    #[test]
    fn clear_drops_everything() {
        let mut calls = DelayedCalls::default();
        calls.call(0.0, ());
        calls.call(1.0, ());
        calls.clear();
        assert!(calls.advance(2.0).is_empty());
    }

    #[test]
    fn frame_steps_still_count_after_long_uptime() {
        let mut calls = DelayedCalls::default();
        calls.advance(600_000.0);
        let id = calls.call(0.2, ());

        let mut fired = 0;
        for _ in 0..600 {
            fired += calls.advance(1.0 / 60.0).len();
        }
        assert_eq!(fired, 1);
        assert!(!calls.is_pending(id));
        assert!(calls.elapsed() > 600_009.0);
    }

    #[test]
    fn clear_rewinds_the_clock() {
        let mut calls = DelayedCalls::default();
        calls.advance(42.0);
        calls.clear();
        assert_eq!(calls.elapsed(), 0.0);

        calls.call(0.1, ());
        assert_eq!(calls.advance(0.1).len(), 1);
    }
}

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    DismissToast,
    CloseModal,
    ClearDeleteTarget,
}

#[derive(Debug)]
struct Pending {
    id: TimerId,
    due: Instant,
    action: TimerAction,
}

/// Delayed UI actions owned by one controller. Nothing fires on its own:
/// the owner drains due actions with [`Timers::take_due`], and dropping or
/// cancelling guarantees they never run.
#[derive(Debug, Default)]
pub struct Timers {
    next: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: TimerAction) -> TimerId {
        self.next += 1;
        let id = TimerId(self.next);
        self.pending.push(Pending {
            id,
            due: now + delay,
            action,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|p| p.id != id);
    }

    pub fn cancel_action(&mut self, action: TimerAction) {
        self.pending.retain(|p| p.action != action);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, action: TimerAction) -> bool {
        self.pending.iter().any(|p| p.action == action)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline, if anything is scheduled.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Removes and returns the actions due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerAction> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.id.0));
        due.into_iter().map(|p| p.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_fire_in_due_order_once() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        timers.schedule(t0, Duration::from_millis(1000), TimerAction::CloseModal);
        timers.schedule(t0, Duration::from_millis(600), TimerAction::ClearDeleteTarget);
        timers.schedule(t0, Duration::from_millis(3000), TimerAction::DismissToast);

        assert!(timers.take_due(t0 + Duration::from_millis(599)).is_empty());
        assert_eq!(
            timers.take_due(t0 + Duration::from_millis(1000)),
            vec![TimerAction::ClearDeleteTarget, TimerAction::CloseModal]
        );
        assert!(timers.take_due(t0 + Duration::from_millis(1000)).is_empty());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        let toast = timers.schedule(t0, Duration::from_millis(10), TimerAction::DismissToast);
        timers.schedule(t0, Duration::from_millis(10), TimerAction::CloseModal);
        timers.cancel(toast);
        assert!(!timers.is_scheduled(TimerAction::DismissToast));

        timers.cancel_all();
        assert!(timers.take_due(t0 + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn next_due_tracks_the_earliest_pending_deadline() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        assert_eq!(timers.next_due(), None);
        timers.schedule(t0, Duration::from_millis(3000), TimerAction::DismissToast);
        timers.schedule(t0, Duration::from_millis(1000), TimerAction::CloseModal);
        assert_eq!(timers.next_due(), Some(t0 + Duration::from_millis(1000)));
        timers.take_due(t0 + Duration::from_millis(1000));
        assert_eq!(timers.next_due(), Some(t0 + Duration::from_millis(3000)));
    }
}

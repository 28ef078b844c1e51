use anyhow::{Result, bail};
use serde::Serialize;
use std::time::Duration;

/// How long a testimonial stays on screen before the carousel advances.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(5);

/// Orientation of the last move, used only to pick the slide animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    Backward,
    #[default]
    None,
    Forward,
}

impl Direction {
    /// Sign of `to - from`.
    pub fn between(from: usize, to: usize) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Backward => -1,
            Direction::None => 0,
            Direction::Forward => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Showing(usize),
    Transitioning {
        from: usize,
        to: usize,
        direction: Direction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    index: usize,
    direction: Direction,
    paused: bool,
    phase: Phase,
    dwell: Duration,
    /// Time since the last index change or pause toggle.
    idle: Duration,
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            bail!("A carousel needs at least one item");
        }
        Ok(Self {
            items,
            index: 0,
            direction: Direction::None,
            paused: false,
            phase: Phase::Showing(0),
            dwell: DEFAULT_DWELL,
            idle: Duration::ZERO,
        })
    }

    /// Replace the auto-advance interval. A zero dwell is rejected.
    pub fn with_dwell(mut self, dwell: Duration) -> Result<Self> {
        if dwell.is_zero() {
            bail!("Carousel dwell time must be greater than zero");
        }
        self.dwell = dwell;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &T {
        &self.items[self.index]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    pub fn next(&mut self) -> Transition {
        let to = (self.index + 1) % self.len();
        self.move_to(to, Direction::Forward)
    }

    pub fn previous(&mut self) -> Transition {
        let to = (self.index + self.len() - 1) % self.len();
        self.move_to(to, Direction::Backward)
    }

    /// Show item `k` (taken modulo the length).
    ///
    /// Jumping to the item already shown leaves the dwell clock and phase alone.
    pub fn jump_to(&mut self, k: usize) -> Transition {
        let to = k % self.len();
        let direction = Direction::between(self.index, to);
        if to == self.index {
            self.direction = direction;
            return Transition {
                from: to,
                to,
                direction,
            };
        }
        self.move_to(to, direction)
    }

    /// Returns whether the flag changed. A change restarts the dwell clock.
    pub fn pause(&mut self) -> bool {
        self.set_paused(true)
    }

    pub fn resume(&mut self) -> bool {
        self.set_paused(false)
    }

    /// The slide animation has finished.
    pub fn finish_transition(&mut self) {
        self.phase = Phase::Showing(self.index);
    }

    /// Let `elapsed` pass on the dwell clock.
    ///
    /// Advances by one item once the carousel has sat unpaused on the same
    /// item for the full dwell time. At most one transition happens per call,
    /// and the clock restarts from zero after it.
    pub fn advance_clock(&mut self, elapsed: Duration) -> Option<Transition> {
        if self.paused {
            return None;
        }
        self.idle = self.idle.saturating_add(elapsed);
        if self.idle >= self.dwell {
            Some(self.next())
        } else {
            None
        }
    }

    /// Time left before the next automatic advance, `None` while paused.
    pub fn time_until_advance(&self) -> Option<Duration> {
        if self.paused {
            None
        } else {
            Some(self.dwell.saturating_sub(self.idle))
        }
    }

    /// `count` consecutive items starting at the current one, wrapping around.
    pub fn visible(&self, count: usize) -> Vec<&T> {
        self.visible_indices(count)
            .into_iter()
            .map(|i| &self.items[i])
            .collect()
    }

    pub fn visible_indices(&self, count: usize) -> Vec<usize> {
        (0..count)
            .map(|offset| (self.index + offset) % self.len())
            .collect()
    }

    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.index + 1, self.len())
    }

    fn move_to(&mut self, to: usize, direction: Direction) -> Transition {
        let from = self.index;
        self.index = to;
        self.direction = direction;
        self.phase = Phase::Transitioning {
            from,
            to,
            direction,
        };
        self.idle = Duration::ZERO;
        Transition {
            from,
            to,
            direction,
        }
    }

    fn set_paused(&mut self, paused: bool) -> bool {
        if self.paused == paused {
            return false;
        }
        self.paused = paused;
        self.idle = Duration::ZERO;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(n: usize) -> Carousel<usize> {
        Carousel::new((0..n).collect()).unwrap()
    }

    #[test]
    fn test_empty_carousel_is_rejected() {
        let result = Carousel::<u8>::new(Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_initial_state() {
        let c = carousel(8);
        assert_eq!(c.index(), 0);
        assert_eq!(c.direction(), Direction::None);
        assert!(!c.is_paused());
        assert_eq!(c.phase(), Phase::Showing(0));
        assert_eq!(c.dwell(), DEFAULT_DWELL);
        assert_eq!(c.progress_label(), "1 / 8");
    }

    #[test]
    fn test_next_wraps() {
        let mut c = carousel(3);
        c.next();
        c.next();
        let t = c.next();
        assert_eq!(
            t,
            Transition {
                from: 2,
                to: 0,
                direction: Direction::Forward
            }
        );
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_previous_wraps() {
        let mut c = carousel(3);
        let t = c.previous();
        assert_eq!(t.to, 2);
        assert_eq!(c.direction(), Direction::Backward);
        assert_eq!(c.direction().as_i8(), -1);
    }

    #[test]
    fn test_single_item() {
        let mut c = carousel(1);
        assert_eq!(c.next().to, 0);
        assert_eq!(c.previous().to, 0);
        assert_eq!(c.visible(3), vec![&0, &0, &0]);
    }

    #[test]
    fn test_jump_to_sets_direction_from_sign() {
        let mut c = carousel(8);
        assert_eq!(c.jump_to(5).direction, Direction::Forward);
        assert_eq!(c.index(), 5);
        assert_eq!(c.jump_to(2).direction, Direction::Backward);
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn test_jump_to_out_of_range_wraps() {
        let mut c = carousel(8);
        c.jump_to(10);
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn test_jump_to_current_keeps_clock_and_phase() {
        let mut c = carousel(8);
        c.advance_clock(Duration::from_secs(3));

        let t = c.jump_to(0);

        assert_eq!(t.direction, Direction::None);
        assert_eq!(c.phase(), Phase::Showing(0));
        assert_eq!(c.time_until_advance(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_transition_phase() {
        let mut c = carousel(4);
        c.next();
        assert_eq!(
            c.phase(),
            Phase::Transitioning {
                from: 0,
                to: 1,
                direction: Direction::Forward
            }
        );
        c.finish_transition();
        assert_eq!(c.phase(), Phase::Showing(1));
    }

    #[test]
    fn test_auto_advance_after_dwell() {
        let mut c = carousel(4);
        assert_eq!(c.advance_clock(Duration::from_millis(4999)), None);
        let t = c.advance_clock(Duration::from_millis(1)).unwrap();
        assert_eq!(t.to, 1);
        assert_eq!(t.direction, Direction::Forward);
        assert_eq!(c.time_until_advance(), Some(DEFAULT_DWELL));
    }

    #[test]
    fn test_manual_move_restarts_clock() {
        let mut c = carousel(4);
        c.advance_clock(Duration::from_secs(4));
        c.previous();
        assert_eq!(c.advance_clock(Duration::from_secs(4)), None);
        assert_eq!(c.index(), 3);
    }

    #[test]
    fn test_paused_never_advances() {
        let mut c = carousel(4);
        assert!(c.pause());
        assert_eq!(c.advance_clock(Duration::from_secs(3600)), None);
        assert_eq!(c.time_until_advance(), None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_resume_schedules_full_dwell() {
        let mut c = carousel(4);
        c.advance_clock(Duration::from_secs(4));
        c.pause();
        assert!(c.resume());
        assert_eq!(c.time_until_advance(), Some(DEFAULT_DWELL));
        assert_eq!(c.advance_clock(Duration::from_secs(4)), None);
        assert!(c.advance_clock(Duration::from_secs(1)).is_some());
    }

    #[test]
    fn test_repeated_pause_does_not_restart_clock() {
        let mut c = carousel(4);
        c.pause();
        assert!(!c.pause());
        assert!(c.resume());
        assert!(!c.resume());
    }

    #[test]
    fn test_manual_moves_work_while_paused() {
        let mut c = carousel(4);
        c.pause();
        c.next();
        c.next();
        assert_eq!(c.index(), 2);
        assert!(c.is_paused());
    }

    #[test]
    fn test_visible_window_wraps() {
        let mut c = carousel(8);
        c.jump_to(7);
        assert_eq!(c.visible(3), vec![&7, &0, &1]);
        assert_eq!(*c.current(), 7);
        assert_eq!(c.progress_label(), "8 / 8");
    }

    #[test]
    fn test_custom_dwell() {
        let mut c = carousel(2).with_dwell(Duration::from_millis(100)).unwrap();
        assert!(c.advance_clock(Duration::from_millis(100)).is_some());
    }

    #[test]
    fn test_zero_dwell_is_rejected() {
        let err = carousel(2).with_dwell(Duration::ZERO).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_visible_indices_wrap() {
        let mut c = carousel(5);
        c.jump_to(3);
        assert_eq!(c.visible_indices(3), vec![3, 4, 0]);
    }
}

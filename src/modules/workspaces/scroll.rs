use crate::config::ScrollBehavior;
use iced::mouse::ScrollDelta;
use std::time::{Duration, Instant};

pub const MIN_SWITCH_INTERVAL: Duration = Duration::from_millis(220);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Horizontal-only and zero deltas carry no direction.
    pub fn from_delta(delta: ScrollDelta) -> Option<Self> {
        let y = match delta {
            ScrollDelta::Lines { y, .. } => y,
            ScrollDelta::Pixels { y, .. } => y,
        };

        if y > 0.0 {
            Some(ScrollDirection::Up)
        } else if y < 0.0 {
            Some(ScrollDirection::Down)
        } else {
            None
        }
    }
}

/// Rate limits scroll driven workspace switching.
///
/// A reversal of direction always goes through, so flicking back and forth
/// is never held back by the cooldown.
#[derive(Debug, Default, Clone)]
pub struct ScrollSwitch {
    last_switch: Option<Instant>,
    last_direction: Option<ScrollDirection>,
}

impl ScrollSwitch {
    /// Returns the workspace step to take (-1 previous, +1 next), if any.
    pub fn register(
        &mut self,
        behavior: ScrollBehavior,
        direction: ScrollDirection,
        now: Instant,
    ) -> Option<i32> {
        let step = match (behavior, direction) {
            (ScrollBehavior::Disabled, _) => return None,
            (ScrollBehavior::Normal, ScrollDirection::Up)
            | (ScrollBehavior::Inverted, ScrollDirection::Down) => -1,
            (ScrollBehavior::Normal, ScrollDirection::Down)
            | (ScrollBehavior::Inverted, ScrollDirection::Up) => 1,
        };

        let cooled_down = self
            .last_switch
            .is_none_or(|last| now.saturating_duration_since(last) > MIN_SWITCH_INTERVAL);

        if cooled_down || self.last_direction != Some(direction) {
            self.last_switch = Some(now);
            self.last_direction = Some(direction);
            Some(step)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn same_direction_within_cooldown_is_dropped() {
        let mut scroll = ScrollSwitch::default();
        let t0 = Instant::now();

        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Down, t0),
            Some(1)
        );
        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Down, t0 + 100 * MS),
            None
        );
        // dropped events do not extend the cooldown
        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Down, t0 + 221 * MS),
            Some(1)
        );
    }

    #[test]
    fn exactly_at_interval_is_still_cooling_down() {
        let mut scroll = ScrollSwitch::default();
        let t0 = Instant::now();

        scroll.register(ScrollBehavior::Normal, ScrollDirection::Up, t0);
        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Up, t0 + 220 * MS),
            None
        );
    }

    #[test]
    fn reversal_bypasses_cooldown() {
        let mut scroll = ScrollSwitch::default();
        let t0 = Instant::now();

        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Up, t0),
            Some(-1)
        );
        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Down, t0 + 10 * MS),
            Some(1)
        );
        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Up, t0 + 20 * MS),
            Some(-1)
        );
    }

    #[test]
    fn inverted_swaps_steps() {
        let mut scroll = ScrollSwitch::default();
        let t0 = Instant::now();

        assert_eq!(
            scroll.register(ScrollBehavior::Inverted, ScrollDirection::Up, t0),
            Some(1)
        );
        assert_eq!(
            scroll.register(ScrollBehavior::Inverted, ScrollDirection::Down, t0 + 500 * MS),
            Some(-1)
        );
    }

    #[test]
    fn disabled_never_switches_nor_records() {
        let mut scroll = ScrollSwitch::default();
        let t0 = Instant::now();

        assert_eq!(
            scroll.register(ScrollBehavior::Disabled, ScrollDirection::Up, t0),
            None
        );
        assert_eq!(
            scroll.register(ScrollBehavior::Normal, ScrollDirection::Up, t0 + MS),
            Some(-1)
        );
    }

    #[test]
    fn direction_from_delta() {
        assert_eq!(
            ScrollDirection::from_delta(ScrollDelta::Lines { x: 0.0, y: 1.0 }),
            Some(ScrollDirection::Up)
        );
        assert_eq!(
            ScrollDirection::from_delta(ScrollDelta::Pixels { x: 0.0, y: -3.5 }),
            Some(ScrollDirection::Down)
        );
        assert_eq!(
            ScrollDirection::from_delta(ScrollDelta::Lines { x: 2.0, y: 0.0 }),
            None
        );
    }
}

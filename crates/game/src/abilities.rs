//! Ability cooldowns
//!
//! The server counts time in 100 ms ticks. Per-ability timers come from
//! AbilityStatus; the client-wide cooldown from AbilityCooldown gates movement
//! and ability use.

use mana_core::AbilityId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Length of one server tick
pub const SERVER_TICK: Duration = Duration::from_millis(100);

/// Convert server ticks to a duration
#[inline]
pub fn ticks_to_duration(ticks: u32) -> Duration {
    SERVER_TICK * ticks
}

/// Known abilities and their remaining cooldown
#[derive(Debug, Default)]
pub struct AbilityList {
    remaining: BTreeMap<AbilityId, Duration>,
}

impl AbilityList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: AbilityId, remaining: Duration) {
        self.remaining.insert(id, remaining);
    }

    /// Forget an ability
    pub fn remove(&mut self, id: AbilityId) -> bool {
        self.remaining.remove(&id).is_some()
    }

    #[inline]
    pub fn remaining(&self, id: AbilityId) -> Option<Duration> {
        self.remaining.get(&id).copied()
    }

    /// Count every timer down by `dt`, stopping at zero
    pub fn advance(&mut self, dt: Duration) {
        for remaining in self.remaining.values_mut() {
            *remaining = remaining.saturating_sub(dt);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityId, Duration)> + '_ {
        self.remaining.iter().map(|(id, remaining)| (*id, *remaining))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

/// Client-wide cooldown deadline on the session clock
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalCooldown {
    deadline: Option<Duration>,
}

impl GlobalCooldown {
    /// Start a cooldown of `length` at session time `now`
    pub fn start(&mut self, now: Duration, length: Duration) {
        self.deadline = Some(now + length);
    }

    /// Whether the deadline lies in the future
    pub fn is_active(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| deadline > now)
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_sub(now))
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks() {
        assert_eq!(ticks_to_duration(25), Duration::from_millis(2500));
    }

    #[test]
    fn test_timers_saturate() {
        let mut abilities = AbilityList::new();
        abilities.set(AbilityId::new(1), Duration::from_millis(150));
        abilities.set(AbilityId::new(2), Duration::from_secs(2));

        abilities.advance(Duration::from_millis(200));
        assert_eq!(abilities.remaining(AbilityId::new(1)), Some(Duration::ZERO));
        assert_eq!(abilities.remaining(AbilityId::new(2)), Some(Duration::from_millis(1800)));

        assert!(abilities.remove(AbilityId::new(1)));
        assert!(!abilities.remove(AbilityId::new(1)));
    }

    #[test]
    fn test_global_cooldown() {
        let mut cooldown = GlobalCooldown::default();
        let now = Duration::from_secs(10);
        assert!(!cooldown.is_active(now));

        cooldown.start(now, Duration::from_millis(500));
        assert!(cooldown.is_active(now + Duration::from_millis(499)));
        assert!(!cooldown.is_active(now + Duration::from_millis(500)));
        assert_eq!(cooldown.remaining(now), Duration::from_millis(500));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Economy ledger that reacts to kill and leak events.
//!
//! The cull and collision logic only reports what happened; the ledger is the
//! sole place where rewards and penalties are applied.

use lane_defence_core::Event;
use tracing::{debug, info};

/// Gold, lives and the game-over latch of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    gold: u32,
    lives: u32,
    game_over: bool,
}

impl Economy {
    /// Creates a ledger with the provided starting resources.
    #[must_use]
    pub const fn new(gold: u32, lives: u32) -> Self {
        Self {
            gold,
            lives,
            game_over: false,
        }
    }

    /// Replaces the starting resources, used when the difficulty changes.
    pub fn reset(&mut self, gold: u32, lives: u32) {
        *self = Self::new(gold, lives);
    }

    /// Applies the reward or penalty carried by `event`.
    ///
    /// Returns [`Event::GameOver`] the first time lives reach zero.
    pub fn handle(&mut self, event: &Event) -> Option<Event> {
        match event {
            Event::EnemyKilled { payout, .. } => {
                self.gold = self.gold.saturating_add(*payout);
                debug!(payout, gold = self.gold, "kill rewarded");
                None
            }
            Event::EnemyLeaked { .. } => {
                self.lives = self.lives.saturating_sub(1);
                debug!(lives = self.lives, "leak penalized");
                if self.lives == 0 && !self.game_over {
                    self.game_over = true;
                    info!("lives exhausted");
                    return Some(Event::GameOver);
                }
                None
            }
            _ => None,
        }
    }

    /// Debits `cost` when affordable; returns whether the debit happened.
    pub fn spend(&mut self, cost: u32) -> bool {
        match self.gold.checked_sub(cost) {
            Some(remaining) => {
                self.gold = remaining;
                true
            }
            None => false,
        }
    }

    /// Gold currently available.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Whether lives ran out.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::Economy;
    use lane_defence_core::{EnemyId, Event};

    fn leak() -> Event {
        Event::EnemyLeaked {
            enemy: EnemyId::new(0),
        }
    }

    #[test]
    fn kills_add_payout() {
        let mut economy = Economy::new(200, 20);

        assert_eq!(
            economy.handle(&Event::EnemyKilled {
                enemy: EnemyId::new(3),
                payout: 15,
            }),
            None
        );

        assert_eq!(economy.gold(), 215);
        assert_eq!(economy.lives(), 20);
    }

    #[test]
    fn last_life_triggers_game_over_once() {
        let mut economy = Economy::new(0, 2);

        assert_eq!(economy.handle(&leak()), None);
        assert_eq!(economy.handle(&leak()), Some(Event::GameOver));
        assert_eq!(economy.handle(&leak()), None, "game over is latched");
        assert_eq!(economy.lives(), 0);
        assert!(economy.is_game_over());
    }

    #[test]
    fn spending_requires_sufficient_gold() {
        let mut economy = Economy::new(80, 20);

        assert!(!economy.spend(81));
        assert_eq!(economy.gold(), 80);
        assert!(economy.spend(80));
        assert_eq!(economy.gold(), 0);
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let mut economy = Economy::new(10, 1);
        assert_eq!(economy.handle(&Event::Victory), None);
        assert_eq!(economy, Economy::new(10, 1));
    }
}

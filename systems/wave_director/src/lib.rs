#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that turns timed spawn schedules into spawn orders.
//!
//! The director owns the pending-spawn queue of the active wave. Each tick the
//! world reports the current simulated time and receives the spawn orders that
//! became due. Events are consumed strictly in list order, so a schedule with
//! a later event placed before an earlier one would stall; configuration
//! validation rejects such schedules before they reach the director.

use std::{collections::VecDeque, time::Duration};

use lane_defence_core::{EnemyKind, SpawnEvent, WaveDefinition, WaveStartError};
use tracing::debug;

/// Request to instantiate `count` enemies of `kind` for `wave`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Zero-based index of the wave the enemies belong to.
    pub wave: u32,
    /// Kind of enemy to create.
    pub kind: EnemyKind,
    /// Number of enemies to create.
    pub count: u32,
}

/// Scheduler that tracks wave progress and releases due spawn events.
#[derive(Debug, Default)]
pub struct WaveDirector {
    pending: VecDeque<SpawnEvent>,
    wave_start: Duration,
    active_wave: Option<u32>,
    waves_started: u32,
}

impl WaveDirector {
    /// Creates a director that has not started any wave.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the next wave of `waves` at simulated time `now`.
    ///
    /// Returns the zero-based index of the started wave.
    pub fn start_next(
        &mut self,
        waves: &[WaveDefinition],
        now: Duration,
    ) -> Result<u32, WaveStartError> {
        if self.active_wave.is_some() {
            return Err(WaveStartError::WaveInProgress);
        }

        let index = usize::try_from(self.waves_started).unwrap_or(usize::MAX);
        let Some(definition) = waves.get(index) else {
            return Err(WaveStartError::NoWavesRemaining);
        };

        let wave = self.waves_started;
        self.pending.clear();
        self.pending.extend(definition.spawns.iter().copied());
        self.wave_start = now;
        self.active_wave = Some(wave);
        self.waves_started = self.waves_started.saturating_add(1);
        debug!(wave, spawn_events = self.pending.len(), "wave started");
        Ok(wave)
    }

    /// Releases every spawn event whose offset elapsed by `now`.
    ///
    /// Stops at the first event that is not yet due, preserving list order.
    pub fn handle(&mut self, now: Duration, out: &mut Vec<SpawnOrder>) {
        let Some(wave) = self.active_wave else {
            return;
        };

        let elapsed = now.saturating_sub(self.wave_start);
        while let Some(next) = self.pending.front() {
            if elapsed < next.offset() {
                break;
            }

            out.push(SpawnOrder {
                wave,
                kind: next.enemy,
                count: next.count,
            });
            let _ = self.pending.pop_front();
        }
    }

    /// Declares the active wave cleared when nothing is pending and nothing is alive.
    ///
    /// Returns the index of the cleared wave exactly once per wave.
    pub fn check_cleared(&mut self, live_enemies: usize) -> Option<u32> {
        let wave = self.active_wave?;
        if !self.pending.is_empty() || live_enemies != 0 {
            return None;
        }

        self.active_wave = None;
        Some(wave)
    }

    /// Reports whether a wave is spawning or still has live enemies.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.active_wave.is_some()
    }

    /// Number of waves started so far.
    #[must_use]
    pub fn waves_started(&self) -> u32 {
        self.waves_started
    }

    /// Number of spawn events still queued for the active wave.
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(spawns: &[(u64, EnemyKind, u32)]) -> WaveDefinition {
        WaveDefinition::new(
            spawns
                .iter()
                .map(|(offset, kind, count)| SpawnEvent::new(*offset, *kind, *count))
                .collect(),
        )
    }

    #[test]
    fn idle_director_emits_nothing() {
        let mut director = WaveDirector::new();
        let mut out = Vec::new();

        director.handle(Duration::from_secs(10), &mut out);

        assert!(out.is_empty());
        assert_eq!(director.check_cleared(0), None);
    }

    #[test]
    fn due_events_release_in_order_and_stop_at_future_offsets() {
        let waves = vec![wave(&[
            (0, EnemyKind::Basic, 2),
            (0, EnemyKind::Fast, 1),
            (2500, EnemyKind::Fast, 4),
        ])];
        let mut director = WaveDirector::new();
        let start = Duration::from_secs(3);
        assert_eq!(director.start_next(&waves, start), Ok(0));

        let mut out = Vec::new();
        director.handle(start + Duration::from_millis(100), &mut out);
        assert_eq!(
            out,
            vec![
                SpawnOrder {
                    wave: 0,
                    kind: EnemyKind::Basic,
                    count: 2
                },
                SpawnOrder {
                    wave: 0,
                    kind: EnemyKind::Fast,
                    count: 1
                },
            ]
        );
        assert_eq!(director.pending_spawns(), 1);

        out.clear();
        director.handle(start + Duration::from_millis(2499), &mut out);
        assert!(out.is_empty());

        director.handle(start + Duration::from_millis(2500), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(director.pending_spawns(), 0);
    }

    #[test]
    fn clear_requires_empty_queue_and_no_live_enemies() {
        let waves = vec![wave(&[(0, EnemyKind::Basic, 1), (1000, EnemyKind::Basic, 1)])];
        let mut director = WaveDirector::new();
        let _ = director.start_next(&waves, Duration::ZERO);

        let mut out = Vec::new();
        director.handle(Duration::from_millis(10), &mut out);
        assert_eq!(director.check_cleared(0), None, "spawns still pending");

        director.handle(Duration::from_millis(1000), &mut out);
        assert_eq!(director.check_cleared(2), None, "enemies still alive");
        assert_eq!(director.check_cleared(0), Some(0));
        assert_eq!(director.check_cleared(0), None, "clear is reported once");
        assert!(!director.in_progress());
    }

    #[test]
    fn start_is_refused_while_in_progress_or_exhausted() {
        let waves = vec![wave(&[(0, EnemyKind::Basic, 1)])];
        let mut director = WaveDirector::new();

        assert_eq!(director.start_next(&waves, Duration::ZERO), Ok(0));
        assert_eq!(
            director.start_next(&waves, Duration::ZERO),
            Err(WaveStartError::WaveInProgress)
        );

        let mut out = Vec::new();
        director.handle(Duration::ZERO, &mut out);
        assert_eq!(director.check_cleared(0), Some(0));
        assert_eq!(
            director.start_next(&waves, Duration::ZERO),
            Err(WaveStartError::NoWavesRemaining)
        );
        assert_eq!(director.waves_started(), 1);
    }
}

//! Pomodoro timer state machine.
//!
//! States are [`PomodoroPhase::Idle`], [`PomodoroPhase::Study`] and
//! [`PomodoroPhase::Break`]. The machine is driven by wall-clock instants
//! passed in by the caller, never by the frame delta, so sparse updates still
//! land on the right phase: a late update replays every boundary it crossed
//! and each new phase starts exactly where the previous one ended.
//!
//! A session runs `cycle_count` Study/Break pairs and then halts in `Idle`.
//! [`PomodoroTimer::reset`] cancels a session from any state.

use bevy_ecs::prelude::Resource;
use smallvec::SmallVec;
use std::time::{Duration, Instant};

pub const STUDY_DURATION: Duration = Duration::from_secs(1500);
pub const BREAK_DURATION: Duration = Duration::from_secs(300);
pub const MIN_CYCLES: u32 = 1;
pub const MAX_CYCLES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroPhase {
    Idle,
    Study,
    Break,
}

/// Boundary crossed by a call to [`PomodoroTimer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroTransition {
    StudyToBreak { cycle: u32 },
    BreakToStudy { cycle: u32 },
    /// The last break ended; the timer is idle again.
    Completed,
}

#[derive(Resource, Debug, Clone)]
pub struct PomodoroTimer {
    state: PomodoroPhase,
    cycle_count: u32,
    current_cycle: u32,
    is_running: bool,
    study_duration: Duration,
    break_duration: Duration,
    phase_started: Option<Instant>,
    /// Elapsed time of the current phase as of the last update.
    elapsed: Duration,
    /// Sum of every phase finished since `start`.
    completed: Duration,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PomodoroTimer {
    pub fn new() -> Self {
        Self::with_durations(STUDY_DURATION, BREAK_DURATION)
    }

    pub fn with_durations(study_duration: Duration, break_duration: Duration) -> Self {
        Self {
            state: PomodoroPhase::Idle,
            cycle_count: MIN_CYCLES,
            current_cycle: 0,
            is_running: false,
            study_duration,
            break_duration,
            phase_started: None,
            elapsed: Duration::ZERO,
            completed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> PomodoroPhase {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn study_duration(&self) -> Duration {
        self.study_duration
    }

    pub fn break_duration(&self) -> Duration {
        self.break_duration
    }

    /// Set the number of Study/Break pairs, clamped to `[MIN_CYCLES, MAX_CYCLES]`.
    pub fn set_cycle_count(&mut self, count: u32) {
        self.cycle_count = count.clamp(MIN_CYCLES, MAX_CYCLES);
    }

    /// GUI "+" button: only while idle.
    pub fn increment_cycles(&mut self) -> bool {
        if self.is_running || self.cycle_count >= MAX_CYCLES {
            return false;
        }
        self.cycle_count += 1;
        true
    }

    /// GUI "-" button: only while idle.
    pub fn decrement_cycles(&mut self) -> bool {
        if self.is_running || self.cycle_count <= MIN_CYCLES {
            return false;
        }
        self.cycle_count -= 1;
        true
    }

    /// Begin a session at `now`. Refused when no cycle is configured.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.cycle_count == 0 {
            return false;
        }
        self.state = PomodoroPhase::Study;
        self.current_cycle = 1;
        self.is_running = true;
        self.phase_started = Some(now);
        self.elapsed = Duration::ZERO;
        self.completed = Duration::ZERO;
        true
    }

    /// Return to idle regardless of the current state.
    pub fn reset(&mut self) {
        self.state = PomodoroPhase::Idle;
        self.current_cycle = 0;
        self.is_running = false;
        self.phase_started = None;
        self.elapsed = Duration::ZERO;
        self.completed = Duration::ZERO;
    }

    fn phase_duration(&self) -> Duration {
        match self.state {
            PomodoroPhase::Study => self.study_duration,
            PomodoroPhase::Break => self.break_duration,
            PomodoroPhase::Idle => Duration::ZERO,
        }
    }

    /// Recompute the phase clock at `now` and apply every boundary crossed.
    pub fn update(&mut self, now: Instant) -> SmallVec<[PomodoroTransition; 2]> {
        let mut transitions = SmallVec::new();
        if !self.is_running {
            return transitions;
        }
        let Some(mut started) = self.phase_started else {
            return transitions;
        };

        loop {
            let elapsed = now.saturating_duration_since(started);
            let duration = self.phase_duration();
            if elapsed < duration {
                self.elapsed = elapsed;
                break;
            }
            self.completed += duration;
            started += duration;
            match self.state {
                PomodoroPhase::Study => {
                    self.state = PomodoroPhase::Break;
                    transitions.push(PomodoroTransition::StudyToBreak {
                        cycle: self.current_cycle,
                    });
                }
                PomodoroPhase::Break => {
                    self.current_cycle += 1;
                    if self.current_cycle > self.cycle_count {
                        self.state = PomodoroPhase::Idle;
                        self.is_running = false;
                        self.elapsed = Duration::ZERO;
                        self.phase_started = None;
                        transitions.push(PomodoroTransition::Completed);
                        return transitions;
                    }
                    self.state = PomodoroPhase::Study;
                    transitions.push(PomodoroTransition::BreakToStudy {
                        cycle: self.current_cycle,
                    });
                }
                PomodoroPhase::Idle => break,
            }
        }
        self.phase_started = Some(started);
        transitions
    }

    /// Time left in the current phase, zero when idle.
    pub fn phase_remaining(&self) -> Duration {
        if !self.is_running {
            return Duration::ZERO;
        }
        self.phase_duration().saturating_sub(self.elapsed)
    }

    /// Finished phases plus the partial current phase.
    pub fn total_elapsed(&self) -> Duration {
        self.completed + self.elapsed
    }
}

/// `HH:MM:SS` rendering used by the Pomodoro panel.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_study_cycle_one() {
        let mut timer = PomodoroTimer::new();
        let t0 = Instant::now();
        assert!(timer.start(t0));
        assert_eq!(timer.state(), PomodoroPhase::Study);
        assert_eq!(timer.current_cycle(), 1);
        assert!(timer.is_running());
        timer.update(t0);
        assert_eq!(timer.total_elapsed(), Duration::ZERO);
        assert_eq!(timer.phase_remaining(), STUDY_DURATION);
    }

    #[test]
    fn test_cycle_buttons_locked_while_running() {
        let mut timer = PomodoroTimer::new();
        assert!(!timer.decrement_cycles());
        assert!(timer.increment_cycles());
        assert_eq!(timer.cycle_count(), 2);
        timer.start(Instant::now());
        assert!(!timer.increment_cycles());
        assert!(!timer.decrement_cycles());
        timer.set_cycle_count(99);
        assert_eq!(timer.cycle_count(), MAX_CYCLES);
        timer.set_cycle_count(0);
        assert_eq!(timer.cycle_count(), MIN_CYCLES);
    }

    #[test]
    fn test_sparse_update_replays_boundaries() {
        let mut timer = PomodoroTimer::new();
        timer.set_cycle_count(3);
        let t0 = Instant::now();
        timer.start(t0);
        let late = t0 + STUDY_DURATION + BREAK_DURATION + Duration::from_secs(10);
        let transitions = timer.update(late);
        assert_eq!(
            transitions.as_slice(),
            &[
                PomodoroTransition::StudyToBreak { cycle: 1 },
                PomodoroTransition::BreakToStudy { cycle: 2 },
            ]
        );
        assert_eq!(timer.state(), PomodoroPhase::Study);
        assert_eq!(
            timer.total_elapsed(),
            STUDY_DURATION + BREAK_DURATION + Duration::from_secs(10)
        );
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_hms(Duration::ZERO), "00:00:00");
    }
}

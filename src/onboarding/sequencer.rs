//! Step sequencer: owns the current step, the countdown and the one pending
//! auto-advance timer.
//!
//! The sequencer is a pure state machine over an injected [`Clock`]. Hosts
//! call [`Sequencer::poll`] whenever a timer might be due (the sleep length is
//! given by [`Sequencer::next_wakeup_ms`]); commands such as skip and
//! play/pause mutate state directly. Every transition is reported as a
//! [`SequencerEvent`].
//!
//! Remaining time has a single source of truth: while a timer is armed it is
//! derived from the timer's deadline, otherwise it is the frozen value stored
//! when the timer was cancelled.

use serde::{Deserialize, Serialize};

use crate::error::{StreaklyError, StreaklyResult};
use super::clock::Clock;
use super::model::{Outcome, Step, StepRegistry};
use super::timer::{PendingTimer, TimerSlot};

/// Why the sequencer moved forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceReason {
    Auto,
    Skip,
}

/// Lifecycle of a mounted sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed, `start()` not called yet.
    Idle,
    Running,
    /// Completed or unmounted. Terminal.
    Finished,
}

/// Transition emitted by a sequencer operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequencerEvent {
    /// The auto-advance timer of step `index` fired at its deadline `at_ms`.
    StepExpired { index: usize, at_ms: u64 },
    /// `at_ms` is the clock time the new step became current.
    Advanced {
        from: usize,
        to: usize,
        reason: AdvanceReason,
        at_ms: u64,
    },
    Paused { remaining_ms: u64 },
    Resumed { remaining_ms: u64 },
    Completed { outcome: Outcome },
}

impl SequencerEvent {
    /// Clock time of the transition, for events tied to a step change.
    pub fn at_ms(&self) -> Option<u64> {
        match self {
            Self::StepExpired { at_ms, .. } | Self::Advanced { at_ms, .. } => Some(*at_ms),
            _ => None,
        }
    }
}

/// Onboarding step state machine.
pub struct Sequencer<C: Clock> {
    registry: StepRegistry,
    clock: C,
    phase: Phase,
    current_index: usize,
    is_playing: bool,
    /// Authoritative only while no timer is armed.
    remaining_ms: u64,
    timer: TimerSlot,
    started_at_ms: u64,
    step_started_at_ms: u64,
    outcome: Option<Outcome>,
}

impl<C: Clock> Sequencer<C> {
    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Creates an idle sequencer positioned on the first step.
    pub fn new(registry: StepRegistry, clock: C) -> Self {
        let remaining_ms = if registry.is_terminal(0) {
            0
        } else {
            registry.step(0).duration_ms
        };
        Self {
            registry,
            clock,
            phase: Phase::Idle,
            current_index: 0,
            is_playing: false,
            remaining_ms,
            timer: TimerSlot::new(),
            started_at_ms: 0,
            step_started_at_ms: 0,
            outcome: None,
        }
    }

    /// Mounts the flow: first step, playing, countdown loaded from its duration.
    ///
    /// Has no effect once the sequencer is finished.
    pub fn start(&mut self) {
        if self.phase == Phase::Finished {
            log::warn!("start() ignored: sequencer already finished");
            return;
        }
        let now = self.clock.now_ms();
        self.timer.cancel();
        self.phase = Phase::Running;
        self.current_index = 0;
        self.is_playing = true;
        self.remaining_ms = self.countdown_duration();
        self.started_at_ms = now;
        self.step_started_at_ms = now;
        self.arm(now);
        log::info!(
            "onboarding started with {} steps",
            self.registry.len()
        );
    }

    /// Stops the sequencer and drops any pending timer.
    ///
    /// Returns true if a timer was cancelled.
    pub fn unmount(&mut self) -> bool {
        let cancelled = self.timer.cancel().is_some();
        if self.phase != Phase::Finished {
            log::info!("onboarding unmounted at step {}", self.current_index);
        }
        self.is_playing = false;
        self.phase = Phase::Finished;
        cancelled
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Moves one step forward.
    ///
    /// A no-op on the terminal step, before `start()`, and after completion.
    pub fn advance(&mut self, reason: AdvanceReason) -> Option<SequencerEvent> {
        let now = self.clock.now_ms();
        self.advance_at(reason, now)
    }

    /// Shorthand for `advance(AdvanceReason::Skip)`.
    pub fn skip(&mut self) -> Option<SequencerEvent> {
        self.advance(AdvanceReason::Skip)
    }

    /// Flips play/pause.
    ///
    /// Pausing freezes the countdown at its current value; resuming arms a new
    /// timer for exactly that remaining time.
    pub fn toggle_play(&mut self) -> Option<SequencerEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        let now = self.clock.now_ms();
        if self.is_playing {
            self.remaining_ms = self.remaining_ms_at(now);
            self.timer.cancel();
            self.is_playing = false;
            log::info!(
                "onboarding paused at step {} with {}ms left",
                self.current_index,
                self.remaining_ms
            );
            Some(SequencerEvent::Paused {
                remaining_ms: self.remaining_ms,
            })
        } else {
            self.is_playing = true;
            self.arm(now);
            log::info!(
                "onboarding resumed at step {} with {}ms left",
                self.current_index,
                self.remaining_ms
            );
            Some(SequencerEvent::Resumed {
                remaining_ms: self.remaining_ms,
            })
        }
    }

    /// Finishes the flow from the terminal step with the chosen outcome.
    pub fn complete(&mut self, outcome: Outcome) -> StreaklyResult<SequencerEvent> {
        match self.phase {
            Phase::Idle => return Err(StreaklyError::NotStarted),
            Phase::Finished => return Err(StreaklyError::FlowFinished),
            Phase::Running => {}
        }
        if !self.is_terminal() {
            return Err(StreaklyError::not_terminal(self.current_index));
        }
        self.timer.cancel();
        self.is_playing = false;
        self.phase = Phase::Finished;
        self.outcome = Some(outcome);
        log::info!("onboarding completed with {}", outcome);
        Ok(SequencerEvent::Completed { outcome })
    }

    // =========================================================================
    // CLOCK DRIVEN
    // =========================================================================

    /// Dispatches every timer that is due at the current clock time.
    ///
    /// Each expiry yields `StepExpired` followed by the automatic advance. The
    /// next step's countdown starts from the expired deadline, not from the
    /// poll time, so late polling never stretches a step.
    pub fn poll(&mut self) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }
        let now = self.clock.now_ms();
        while let Some(expired) = self.timer.take_due(now) {
            debug_assert_eq!(
                expired.step_index, self.current_index,
                "timer outlived its step"
            );
            log::trace!("step {} expired at {}ms", expired.step_index, expired.due_at_ms);
            events.push(SequencerEvent::StepExpired {
                index: expired.step_index,
                at_ms: expired.due_at_ms,
            });
            self.remaining_ms = 0;
            if let Some(advanced) = self.advance_at(AdvanceReason::Auto, expired.due_at_ms) {
                events.push(advanced);
            }
        }
        events
    }

    /// Countdown refresh for display.
    ///
    /// Returns the remaining time when the countdown is visible (running,
    /// playing, timed non-terminal step), `None` otherwise. Never advances.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase != Phase::Running
            || !self.is_playing
            || self.current_step().is_manual()
            || self.is_terminal()
        {
            return None;
        }
        Some(self.remaining_ms())
    }

    /// Milliseconds until the pending timer is due, if one is armed.
    pub fn next_wakeup_ms(&self) -> Option<u64> {
        let now = self.clock.now_ms();
        self.timer.pending().map(|t| t.remaining_at(now))
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_step(&self) -> &Step {
        debug_assert!(self.current_index < self.registry.len());
        self.registry.step(self.current_index)
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_terminal(&self) -> bool {
        self.registry.is_terminal(self.current_index)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Skip is offered on any non-terminal step of a running flow.
    pub fn can_skip(&self) -> bool {
        self.phase == Phase::Running && !self.is_terminal()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms_at(self.clock.now_ms())
    }

    /// Remaining time rounded up to whole seconds.
    pub fn display_seconds(&self) -> u64 {
        self.remaining_ms().div_ceil(1000)
    }

    /// Share of the flow reached, counting the current step as seen.
    pub fn progress_percent(&self) -> f64 {
        (self.current_index + 1) as f64 / self.registry.len() as f64 * 100.0
    }

    /// Milliseconds since the current step became current.
    pub fn step_elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.step_started_at_ms)
    }

    /// Milliseconds since `start()`.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_at(self.clock.now_ms())
    }

    /// Milliseconds from `start()` to the clock time `at_ms`.
    pub fn elapsed_at(&self, at_ms: u64) -> u64 {
        match self.phase {
            Phase::Idle => 0,
            _ => at_ms.saturating_sub(self.started_at_ms),
        }
    }

    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.timer.pending()
    }

    /// Number of timers scheduled over the sequencer's lifetime.
    pub fn scheduled_timer_count(&self) -> u64 {
        self.timer.scheduled_total()
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    fn remaining_ms_at(&self, now: u64) -> u64 {
        match self.timer.pending() {
            Some(timer) => timer.remaining_at(now),
            None => self.remaining_ms,
        }
    }

    /// Advances as if the transition happened at `at_ms`.
    fn advance_at(&mut self, reason: AdvanceReason, at_ms: u64) -> Option<SequencerEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        if self.is_terminal() {
            log::trace!("advance({:?}) ignored on terminal step", reason);
            return None;
        }
        self.timer.cancel();
        let from = self.current_index;
        self.current_index += 1;
        self.remaining_ms = self.countdown_duration();
        self.step_started_at_ms = at_ms;
        self.arm(at_ms);
        log::debug!("step {} -> {} ({:?})", from, self.current_index, reason);
        Some(SequencerEvent::Advanced {
            from,
            to: self.current_index,
            reason,
            at_ms,
        })
    }

    /// Countdown loaded when the current step becomes current. The terminal
    /// step has no countdown.
    fn countdown_duration(&self) -> u64 {
        if self.is_terminal() {
            0
        } else {
            self.current_step().duration_ms
        }
    }

    /// Arms the auto-advance timer when the current step counts down.
    fn arm(&mut self, now: u64) {
        if self.is_playing && !self.current_step().is_manual() && !self.is_terminal() {
            self.timer.schedule(self.current_index, now, self.remaining_ms);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::clock::VirtualClock;
    use crate::onboarding::model::StepKind;

    fn registry(durations: &[u64]) -> StepRegistry {
        let steps = durations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Step::new(
                    format!("step-{}", i),
                    *d,
                    format!("Step {}", i),
                    StepKind::Entrance {
                        user_name: "Traveler".to_string(),
                    },
                )
            })
            .collect();
        StepRegistry::new(steps).unwrap()
    }

    fn started(durations: &[u64]) -> (Sequencer<VirtualClock>, VirtualClock) {
        let clock = VirtualClock::new();
        let mut seq = Sequencer::new(registry(durations), clock.clone());
        seq.start();
        (seq, clock)
    }

    #[test]
    fn test_start_loads_first_step() {
        let (seq, _) = started(&[1500, 0]);
        assert_eq!(seq.phase(), Phase::Running);
        assert_eq!(seq.current_index(), 0);
        assert!(seq.is_playing());
        assert_eq!(seq.remaining_ms(), 1500);
        assert_eq!(seq.next_wakeup_ms(), Some(1500));
    }

    #[test]
    fn test_idle_sequencer_ignores_commands() {
        let clock = VirtualClock::new();
        let mut seq = Sequencer::new(registry(&[1000, 0]), clock.clone());
        assert_eq!(seq.skip(), None);
        assert_eq!(seq.toggle_play(), None);
        clock.advance(5000);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.complete(Outcome::StartSolo), Err(StreaklyError::NotStarted));
    }

    #[test]
    fn test_auto_advance_fires_exactly_at_duration() {
        let (mut seq, clock) = started(&[1000, 2000, 0]);
        clock.advance(999);
        assert!(seq.poll().is_empty());
        clock.advance(1);
        assert_eq!(
            seq.poll(),
            vec![
                SequencerEvent::StepExpired { index: 0, at_ms: 1000 },
                SequencerEvent::Advanced {
                    from: 0,
                    to: 1,
                    reason: AdvanceReason::Auto,
                    at_ms: 1000,
                },
            ]
        );
        // Polling again at the same instant does nothing.
        assert!(seq.poll().is_empty());
        assert_eq!(seq.remaining_ms(), 2000);
    }

    #[test]
    fn test_late_poll_keeps_exact_deadlines() {
        let (mut seq, clock) = started(&[1000, 1000, 1000, 0]);
        clock.advance(2500);
        let events = seq.poll();
        assert_eq!(events.len(), 4);
        assert_eq!(seq.current_index(), 2);
        // Step 2 became current at t=2000, so 500ms remain.
        assert_eq!(seq.remaining_ms(), 500);
        assert_eq!(seq.step_elapsed_ms(), 500);
        let stamps: Vec<_> = events.iter().filter_map(SequencerEvent::at_ms).collect();
        assert_eq!(stamps, [1000, 1000, 2000, 2000]);
    }

    #[test]
    fn test_terminal_step_shows_no_countdown() {
        let (mut seq, clock) = started(&[1000, 5000]);
        seq.skip();
        assert!(seq.is_terminal());
        assert_eq!(seq.remaining_ms(), 0);
        assert_eq!(seq.display_seconds(), 0);
        assert_eq!(seq.tick(), None);
        clock.advance(2000);
        assert_eq!(seq.remaining_ms(), 0);

        let (seq, _) = started(&[5000]);
        assert_eq!(seq.remaining_ms(), 0);
    }

    #[test]
    fn test_pause_delays_advance_by_pause_length() {
        let (mut seq, clock) = started(&[1000, 0]);
        clock.advance(400);
        assert_eq!(seq.toggle_play(), Some(SequencerEvent::Paused { remaining_ms: 600 }));
        assert_eq!(seq.pending_timer(), None);

        clock.advance(5000);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.remaining_ms(), 600);
        assert_eq!(seq.tick(), None);

        assert_eq!(seq.toggle_play(), Some(SequencerEvent::Resumed { remaining_ms: 600 }));
        clock.advance(599);
        assert!(seq.poll().is_empty());
        clock.advance(1);
        assert_eq!(seq.poll().len(), 2);
        assert_eq!(seq.current_index(), 1);
        assert_eq!(clock.now_ms(), 6000);
    }

    #[test]
    fn test_double_toggle_schedules_single_timer() {
        let (mut seq, clock) = started(&[1000, 0]);
        clock.advance(300);
        seq.toggle_play();
        seq.toggle_play();
        assert!(seq.is_playing());
        // One for start(), one for the resume.
        assert_eq!(seq.scheduled_timer_count(), 2);
        let timer = seq.pending_timer().unwrap();
        assert_eq!(timer.due_at_ms, 1000);

        clock.advance(699);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.current_index(), 0);
        clock.advance(1);
        assert_eq!(seq.poll().len(), 2);
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn test_skip_cancels_pending_timer() {
        let (mut seq, clock) = started(&[1000, 1000, 0]);
        clock.advance(500);
        assert_eq!(
            seq.skip(),
            Some(SequencerEvent::Advanced {
                from: 0,
                to: 1,
                reason: AdvanceReason::Skip,
                at_ms: 500,
            })
        );
        let timer = seq.pending_timer().unwrap();
        assert_eq!(timer.step_index, 1);
        assert_eq!(timer.due_at_ms, 1500);

        // The old deadline (t=1000) must not fire.
        clock.advance(500);
        assert!(seq.poll().is_empty());
        clock.advance(500);
        assert_eq!(
            seq.poll()[0],
            SequencerEvent::StepExpired {
                index: 1,
                at_ms: 1500
            }
        );
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_skip_while_paused_keeps_paused() {
        let (mut seq, clock) = started(&[1000, 3000, 0]);
        seq.toggle_play();
        assert!(seq.skip().is_some());
        assert!(!seq.is_playing());
        assert_eq!(seq.pending_timer(), None);
        assert_eq!(seq.remaining_ms(), 3000);
        clock.advance(10_000);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn test_index_never_passes_terminal() {
        let (mut seq, _) = started(&[1000, 1000, 1000]);
        let moved = (0..10).filter_map(|_| seq.skip()).count();
        assert_eq!(moved, 2);
        assert_eq!(seq.current_index(), 2);
        assert!(seq.is_terminal());
        assert!(!seq.can_skip());
        assert_eq!(seq.advance(AdvanceReason::Auto), None);
    }

    #[test]
    fn test_manual_and_terminal_scenario() {
        let (mut seq, clock) = started(&[1000, 0, 1000]);

        clock.advance(1000);
        seq.poll();
        assert_eq!(seq.current_index(), 1);
        assert_eq!(seq.pending_timer(), None);

        // Manual step waits however long it takes.
        clock.advance(60_000);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.current_index(), 1);

        assert!(seq.advance(AdvanceReason::Skip).is_some());
        assert_eq!(seq.current_index(), 2);

        // Terminal step never arms a timer, even with a duration.
        assert_eq!(seq.pending_timer(), None);
        clock.advance(1000);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.advance(AdvanceReason::Auto), None);

        assert_eq!(
            seq.complete(Outcome::StartSolo),
            Ok(SequencerEvent::Completed {
                outcome: Outcome::StartSolo
            })
        );
        assert!(seq.is_finished());
        assert_eq!(seq.outcome(), Some(Outcome::StartSolo));
        assert_eq!(seq.tick(), None);
    }

    #[test]
    fn test_complete_rejected_off_terminal() {
        let (mut seq, _) = started(&[1000, 0]);
        assert_eq!(
            seq.complete(Outcome::CreateClan),
            Err(StreaklyError::NotTerminal { index: 0 })
        );
        assert!(!seq.is_finished());
        seq.skip();
        assert!(seq.complete(Outcome::CreateClan).is_ok());
        assert_eq!(
            seq.complete(Outcome::CreateClan),
            Err(StreaklyError::FlowFinished)
        );
    }

    #[test]
    fn test_unmount_cancels_pending_timer() {
        let (mut seq, clock) = started(&[1000, 0]);
        assert!(seq.unmount());
        assert_eq!(seq.pending_timer(), None);
        clock.advance(5000);
        assert!(seq.poll().is_empty());
        assert_eq!(seq.skip(), None);
        assert_eq!(seq.current_index(), 0);
        // Second unmount has nothing left to cancel.
        assert!(!seq.unmount());
        seq.start();
        assert_eq!(seq.phase(), Phase::Finished);
    }

    #[test]
    fn test_tick_reports_countdown() {
        let (mut seq, clock) = started(&[3000, 0]);
        clock.advance(1000);
        assert_eq!(seq.tick(), Some(2000));
        clock.advance(1000);
        assert_eq!(seq.tick(), Some(1000));
        // tick never advances, even past the deadline.
        clock.advance(2000);
        assert_eq!(seq.tick(), Some(0));
        assert_eq!(seq.current_index(), 0);
        seq.poll();
        assert_eq!(seq.tick(), None);
    }

    #[test]
    fn test_display_seconds_round_up() {
        let (seq, clock) = started(&[20_000, 0]);
        assert_eq!(seq.display_seconds(), 20);
        clock.advance(500);
        assert_eq!(seq.display_seconds(), 20);
        clock.advance(19_000);
        assert_eq!(seq.display_seconds(), 1);
    }

    #[test]
    fn test_progress_percent() {
        let (mut seq, _) = started(&[1000, 1000, 1000, 0]);
        assert_eq!(seq.progress_percent(), 25.0);
        seq.skip();
        seq.skip();
        seq.skip();
        assert_eq!(seq.progress_percent(), 100.0);
    }

    #[test]
    fn test_single_step_registry_is_terminal_at_start() {
        let (mut seq, _) = started(&[5000]);
        assert!(seq.is_terminal());
        assert_eq!(seq.pending_timer(), None);
        assert!(seq.complete(Outcome::SkipToDashboard).is_ok());
    }

    #[test]
    fn test_event_json_shape() {
        let event = SequencerEvent::Advanced {
            from: 1,
            to: 2,
            reason: AdvanceReason::Skip,
            at_ms: 4200,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "advanced");
        assert_eq!(json["reason"], "skip");
        assert_eq!(json["at_ms"], 4200);
    }
}

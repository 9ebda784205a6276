//! The mounted onboarding flow.
//!
//! `OnboardingFlow` is what a hosting page talks to. It wraps one
//! [`Sequencer`] and adds the pieces that sit around it in the UI: the current
//! body frame, the sound toggle, analytics and the completion callback.

use serde::Serialize;

use crate::config::OnboardingConfig;
use crate::error::StreaklyResult;
use super::analytics::{AnalyticsKind, AnalyticsLog};
use super::body::BodyFrame;
use super::clock::Clock;
use super::model::{Outcome, StepRegistry};
use super::sequencer::{AdvanceReason, Sequencer, SequencerEvent};

/// Host callback invoked once with the chosen outcome.
pub type CompletionHandler = Box<dyn FnMut(Outcome)>;

/// Serializable view of everything the host needs to draw the flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSnapshot {
    pub step_index: usize,
    pub step_count: usize,
    pub step_id: String,
    pub title: String,
    pub is_playing: bool,
    pub remaining_ms: u64,
    pub display_seconds: u64,
    pub progress_percent: f64,
    pub can_skip: bool,
    pub is_terminal: bool,
    pub sound_enabled: bool,
    pub completed: Option<Outcome>,
    pub body: BodyFrame,
}

pub struct OnboardingFlow<C: Clock> {
    sequencer: Sequencer<C>,
    analytics: AnalyticsLog,
    sound_enabled: bool,
    tick_interval_ms: u64,
    on_complete: Option<CompletionHandler>,
}

impl<C: Clock> OnboardingFlow<C> {
    pub fn new(registry: StepRegistry, clock: C, config: &OnboardingConfig) -> Self {
        Self {
            sequencer: Sequencer::new(registry, clock),
            analytics: AnalyticsLog::new(),
            sound_enabled: config.sound_enabled,
            tick_interval_ms: config.tick_interval_ms,
            on_complete: None,
        }
    }

    /// The stock six-step flow greeting `user_name` (or the placeholder).
    pub fn standard(config: &OnboardingConfig, user_name: Option<&str>, clock: C) -> Self {
        Self::new(StepRegistry::standard(config, user_name), clock, config)
    }

    /// Builder: register the completion callback.
    pub fn with_completion_handler(mut self, handler: impl FnMut(Outcome) + 'static) -> Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    /// Builder: replace the analytics log (e.g. to pin the session id).
    pub fn with_analytics(mut self, analytics: AnalyticsLog) -> Self {
        self.analytics = analytics;
        self
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    pub fn start(&mut self) {
        self.sequencer.start();
    }

    /// Dispatches due timers, recording each automatic advance at the time
    /// its step expired.
    pub fn poll(&mut self) -> Vec<SequencerEvent> {
        let events = self.sequencer.poll();
        for event in &events {
            if let SequencerEvent::Advanced {
                from,
                reason: AdvanceReason::Auto,
                at_ms,
                ..
            } = *event
            {
                let elapsed = self.sequencer.elapsed_at(at_ms);
                self.analytics
                    .track(AnalyticsKind::StepAutoAdvance { from_step: from }, from, elapsed);
            }
        }
        events
    }

    pub fn tick(&mut self) -> Option<u64> {
        self.sequencer.tick()
    }

    pub fn skip(&mut self) -> Option<SequencerEvent> {
        let from = self.sequencer.current_index();
        let event = self.sequencer.skip()?;
        self.analytics.track(
            AnalyticsKind::StepSkipped { from_step: from },
            from,
            self.sequencer.elapsed_ms(),
        );
        Some(event)
    }

    pub fn toggle_play(&mut self) -> Option<SequencerEvent> {
        let event = self.sequencer.toggle_play()?;
        let kind = match event {
            SequencerEvent::Paused { .. } => AnalyticsKind::OnboardingPaused,
            _ => AnalyticsKind::OnboardingResumed,
        };
        self.analytics
            .track(kind, self.sequencer.current_index(), self.sequencer.elapsed_ms());
        Some(event)
    }

    /// Flips the sound toggle, returning the new state.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Completes the flow, notifies the host and returns its navigation target.
    pub fn complete(&mut self, outcome: Outcome) -> StreaklyResult<&'static str> {
        let step = self.sequencer.current_index();
        self.sequencer.complete(outcome)?;
        self.analytics.track(
            AnalyticsKind::OnboardingCompleted {
                final_action: outcome,
            },
            step,
            self.sequencer.elapsed_ms(),
        );
        if let Some(handler) = self.on_complete.as_mut() {
            handler(outcome);
        }
        Ok(outcome.route())
    }

    /// Like [`complete`](Self::complete) but takes the outcome's wire tag.
    pub fn complete_tag(&mut self, tag: &str) -> StreaklyResult<&'static str> {
        let outcome: Outcome = tag.parse()?;
        self.complete(outcome)
    }

    pub fn unmount(&mut self) -> bool {
        self.sequencer.unmount()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn snapshot(&self) -> FlowSnapshot {
        let seq = &self.sequencer;
        let step = seq.current_step();
        FlowSnapshot {
            step_index: seq.current_index(),
            step_count: seq.registry().len(),
            step_id: step.id.clone(),
            title: step.title.clone(),
            is_playing: seq.is_playing(),
            remaining_ms: seq.remaining_ms(),
            display_seconds: seq.display_seconds(),
            progress_percent: seq.progress_percent(),
            can_skip: seq.can_skip(),
            is_terminal: seq.is_terminal(),
            sound_enabled: self.sound_enabled,
            completed: seq.outcome(),
            body: BodyFrame::at(&step.kind, seq.step_elapsed_ms()),
        }
    }

    pub fn sequencer(&self) -> &Sequencer<C> {
        &self.sequencer
    }

    pub fn analytics(&self) -> &AnalyticsLog {
        &self.analytics
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn next_wakeup_ms(&self) -> Option<u64> {
        self.sequencer.next_wakeup_ms()
    }
}

// =============================================================================
// TESTS
// =============================================================================

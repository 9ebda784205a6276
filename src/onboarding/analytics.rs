//! Onboarding analytics.
//!
//! Events are kept in memory for the lifetime of one flow and mirrored to the
//! `log` facade. Nothing is sent anywhere.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Outcome;

/// What happened, with its event-specific properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum AnalyticsKind {
    StepAutoAdvance { from_step: usize },
    StepSkipped { from_step: usize },
    OnboardingPaused,
    OnboardingResumed,
    OnboardingCompleted { final_action: Outcome },
}

impl AnalyticsKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsKind::StepAutoAdvance { .. } => "step_auto_advance",
            AnalyticsKind::StepSkipped { .. } => "step_skipped",
            AnalyticsKind::OnboardingPaused => "onboarding_paused",
            AnalyticsKind::OnboardingResumed => "onboarding_resumed",
            AnalyticsKind::OnboardingCompleted { .. } => "onboarding_completed",
        }
    }
}

/// One recorded analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub kind: AnalyticsKind,
    /// Step index current when the event was recorded.
    pub step: usize,
    /// Milliseconds since the flow started.
    pub elapsed_ms: u64,
}

/// Per-flow analytics log.
#[derive(Debug, Clone)]
pub struct AnalyticsLog {
    session_id: Uuid,
    events: Vec<AnalyticsEvent>,
}

impl AnalyticsLog {
    /// Creates an empty log with a fresh session id.
    pub fn new() -> Self {
        Self::with_session(Uuid::new_v4())
    }

    pub fn with_session(session_id: Uuid) -> Self {
        Self {
            session_id,
            events: Vec::new(),
        }
    }

    pub fn track(&mut self, kind: AnalyticsKind, step: usize, elapsed_ms: u64) {
        log::info!(
            "analytics: {} step={} t={}ms session={}",
            kind.name(),
            step,
            elapsed_ms,
            self.session_id
        );
        self.events.push(AnalyticsEvent {
            session_id: self.session_id,
            kind,
            step,
            elapsed_ms,
        });
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    /// Names of the recorded events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind.name()).collect()
    }
}

impl Default for AnalyticsLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_records_in_order() {
        let mut analytics = AnalyticsLog::new();
        analytics.track(AnalyticsKind::OnboardingPaused, 2, 4000);
        analytics.track(AnalyticsKind::StepSkipped { from_step: 2 }, 2, 4500);
        assert_eq!(analytics.names(), ["onboarding_paused", "step_skipped"]);
        assert!(analytics
            .events()
            .iter()
            .all(|e| e.session_id == analytics.session_id()));
    }

    #[test]
    fn test_sessions_are_distinct() {
        assert_ne!(AnalyticsLog::new().session_id(), AnalyticsLog::new().session_id());
    }

    #[test]
    fn test_event_json_is_flat() {
        let session = Uuid::nil();
        let mut analytics = AnalyticsLog::with_session(session);
        analytics.track(
            AnalyticsKind::OnboardingCompleted {
                final_action: Outcome::CreateClan,
            },
            5,
            120_000,
        );
        let json = serde_json::to_value(&analytics.events()[0]).unwrap();
        assert_eq!(json["name"], "onboarding_completed");
        assert_eq!(json["final_action"], "create_clan");
        assert_eq!(json["step"], 5);
        assert_eq!(json["elapsed_ms"], 120_000);
    }
}

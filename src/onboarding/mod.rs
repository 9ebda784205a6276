//! Onboarding flow module.
//!
//! Provides the step registry, the clock-driven sequencer and the mounted flow
//! a hosting page drives.

pub mod analytics;
pub mod body;
pub mod clock;
pub mod flow;
pub mod model;
pub mod sequencer;
pub mod timer;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use analytics::{AnalyticsEvent, AnalyticsKind, AnalyticsLog};
pub use body::BodyFrame;
pub use clock::{Clock, SystemClock, VirtualClock};
pub use flow::{FlowSnapshot, OnboardingFlow};
pub use model::{Outcome, Step, StepKind, StepRegistry};
pub use sequencer::{AdvanceReason, Phase, Sequencer, SequencerEvent};
pub use timer::{PendingTimer, TimerSlot};

#[cfg(feature = "wasm")]
pub use wasm::JsOnboardingFlow;

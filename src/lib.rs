//! Streakly - onboarding sequencer and registration flow for a gamified habit tracker.
//!
//! The crate holds the UI-independent state behind Streakly's first-run
//! experience:
//!
//! - **Onboarding**: an ordered registry of steps, a clock-driven sequencer with
//!   auto-advance, skip and play/pause, and per-step body frames
//! - **Registration**: the account form, field validation and avatar choice
//!
//! All state is ephemeral and owned by the mounted flow. Time comes from an
//! injected [`Clock`], so the whole flow can be driven deterministically.
//!
//! # Example
//!
//! ```rust
//! use streakly::{OnboardingConfig, OnboardingFlow, Outcome, VirtualClock};
//!
//! let clock = VirtualClock::new();
//! let config = OnboardingConfig::default();
//! let mut flow = OnboardingFlow::standard(&config, Some("Ada"), clock.clone());
//! flow.start();
//!
//! // Twenty seconds later the welcome step expires on its own.
//! clock.advance(20_000);
//! flow.poll();
//! assert_eq!(flow.snapshot().step_id, "realms");
//!
//! // Skip the rest and pick an outcome on the final step.
//! while flow.skip().is_some() {}
//! let route = flow.complete(Outcome::StartSolo).unwrap();
//! assert_eq!(route, "/solo-adventure-dashboard");
//! ```

pub mod config;
pub mod error;

pub mod onboarding;
pub mod registration;

// Re-exports for convenience
pub use config::OnboardingConfig;
pub use error::{StreaklyError, StreaklyResult};
pub use onboarding::{
    AdvanceReason, BodyFrame, Clock, FlowSnapshot, OnboardingFlow, Outcome, Sequencer,
    SequencerEvent, Step, StepKind, StepRegistry, SystemClock, VirtualClock,
};
pub use registration::{validate_account, Field, RegistrationFlow, RegistrationForm, ValidationErrors};

#[cfg(feature = "wasm")]
pub use onboarding::JsOnboardingFlow;

#[cfg(feature = "wasm")]
pub use registration::JsRegistrationFlow;

/// Initialize the wasm module. Call once before using any other export.
/// Sets up the panic hook and console logging.
#[cfg(feature = "wasm")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn streakly_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

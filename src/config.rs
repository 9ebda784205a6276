//! Onboarding configuration.
//!
//! Every field has a default, so an empty JSON object (`{}`) yields the
//! stock Streakly flow.

use serde::{Deserialize, Serialize};

use crate::error::{StreaklyError, StreaklyResult};

/// Default display name when the host supplies none.
pub const DEFAULT_USER_NAME: &str = "Traveler";

/// Default display duration of each auto-advancing step.
pub const DEFAULT_STEP_DURATION_MS: u64 = 20_000;

/// Default countdown refresh interval.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Tunables for building and hosting an onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// Placeholder used for the greeting when no name is supplied.
    pub default_user_name: String,

    /// Duration of every step except the call-to-action (which is manual).
    pub step_duration_ms: u64,

    /// How often the host is expected to call `tick()`.
    pub tick_interval_ms: u64,

    /// Initial state of the sound toggle.
    pub sound_enabled: bool,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            default_user_name: DEFAULT_USER_NAME.to_string(),
            step_duration_ms: DEFAULT_STEP_DURATION_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            sound_enabled: true,
        }
    }
}

impl OnboardingConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json(json: &str) -> StreaklyResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: set the placeholder user name.
    pub fn with_default_user_name(mut self, name: impl Into<String>) -> Self {
        self.default_user_name = name.into();
        self
    }

    /// Builder: set the per-step duration.
    pub fn with_step_duration_ms(mut self, ms: u64) -> Self {
        self.step_duration_ms = ms;
        self
    }

    /// Builder: set the tick interval.
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> StreaklyResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(StreaklyError::invalid_config(
                "tick_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.default_user_name.trim().is_empty() {
            return Err(StreaklyError::invalid_config(
                "default_user_name",
                "must not be blank",
            ));
        }
        Ok(())
    }

    /// Returns `name` unless it is missing or blank, else the placeholder.
    pub fn resolve_user_name(&self, name: Option<&str>) -> String {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => self.default_user_name.clone(),
        }
    }
}

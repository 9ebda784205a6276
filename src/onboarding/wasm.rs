//! WASM bindings for the onboarding module.
//!
//! The browser owns the real timer. After every call that may change the
//! schedule, ask `nextWakeupMs()` and keep a single `setTimeout` pending for
//! that long; when it fires, call `poll()`. Clear the timeout and call
//! `unmount()` when the component unmounts.

use js_sys::Function;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use crate::config::OnboardingConfig;
use crate::error::StreaklyError;
use super::clock::Clock;
use super::flow::OnboardingFlow;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<StreaklyError> for JsValue {
    fn from(err: StreaklyError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

// =============================================================================
// CLOCK
// =============================================================================

/// `Date.now()` clock.
///
/// Wall time can step backwards; readings are clamped to the last seen value
/// so the sequencer still sees a monotonic clock.
pub struct JsClock {
    last: std::cell::Cell<u64>,
}

impl JsClock {
    pub fn new() -> Self {
        Self {
            last: std::cell::Cell::new(0),
        }
    }
}

impl Default for JsClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        let now = (js_sys::Date::now() as u64).max(self.last.get());
        self.last.set(now);
        now
    }
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// Registers `on_complete` to receive the outcome tag.
fn with_js_callback(
    flow: OnboardingFlow<JsClock>,
    on_complete: Option<Function>,
) -> OnboardingFlow<JsClock> {
    match on_complete {
        Some(callback) => flow.with_completion_handler(move |outcome| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(outcome.as_str())) {
                log::error!("onComplete callback threw: {:?}", e);
            }
        }),
        None => flow,
    }
}

/// JavaScript-friendly wrapper around OnboardingFlow.
#[wasm_bindgen]
pub struct JsOnboardingFlow {
    inner: OnboardingFlow<JsClock>,
}

#[wasm_bindgen]
impl JsOnboardingFlow {
    /// Creates the standard six-step flow.
    ///
    /// # Arguments
    /// * `user_name` - Display name for the greeting; falls back to "Traveler"
    /// * `on_complete` - Called with the outcome tag when the flow completes
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const flow = new JsOnboardingFlow('Ada', (outcome) => navigate('/solo-adventure-dashboard'));
    /// flow.start();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(user_name: Option<String>, on_complete: Option<Function>) -> JsOnboardingFlow {
        let config = OnboardingConfig::default();
        let inner = OnboardingFlow::standard(&config, user_name.as_deref(), JsClock::new());
        JsOnboardingFlow {
            inner: with_js_callback(inner, on_complete),
        }
    }

    /// Creates the standard flow from a JSON config string.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const flow = JsOnboardingFlow.withConfig('{"step_duration_ms": 8000}', 'Ada', onComplete);
    /// ```
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        config_json: &str,
        user_name: Option<String>,
        on_complete: Option<Function>,
    ) -> Result<JsOnboardingFlow, JsValue> {
        let config = OnboardingConfig::from_json(config_json)?;
        let inner = OnboardingFlow::standard(&config, user_name.as_deref(), JsClock::new());
        Ok(JsOnboardingFlow {
            inner: with_js_callback(inner, on_complete),
        })
    }

    pub fn start(&mut self) {
        self.inner.start();
    }

    /// Dispatches due timers. Returns an array of sequencer events.
    pub fn poll(&mut self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.poll())?)
    }

    /// Remaining milliseconds for the countdown display, or undefined when hidden.
    pub fn tick(&mut self) -> Option<f64> {
        self.inner.tick().map(|ms| ms as f64)
    }

    /// Skips to the next step. Returns the event, or null on the terminal step.
    pub fn skip(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.skip() {
            Some(event) => Ok(to_js_value(&event)?),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.toggle_play() {
            Some(event) => Ok(to_js_value(&event)?),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = toggleSound)]
    pub fn toggle_sound(&mut self) -> bool {
        self.inner.toggle_sound()
    }

    /// Completes the flow with an outcome tag; returns the route to navigate to.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const route = flow.complete('start_solo'); // "/solo-adventure-dashboard"
    /// ```
    pub fn complete(&mut self, outcome: &str) -> Result<String, JsValue> {
        let route = self.inner.complete_tag(outcome)?;
        Ok(route.to_string())
    }

    pub fn unmount(&mut self) -> bool {
        self.inner.unmount()
    }

    /// Full view state for rendering.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.snapshot())?)
    }

    /// Milliseconds until `poll()` should next be called, or undefined.
    #[wasm_bindgen(js_name = nextWakeupMs)]
    pub fn next_wakeup_ms(&self) -> Option<f64> {
        self.inner.next_wakeup_ms().map(|ms| ms as f64)
    }

    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> f64 {
        self.inner.tick_interval_ms() as f64
    }

    /// Recorded analytics events.
    pub fn analytics(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.analytics().events())?)
    }
}

//! WASM bindings for the registration module.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use super::flow::RegistrationFlow;
use super::model::Field;

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

/// JavaScript-friendly wrapper around RegistrationFlow.
#[wasm_bindgen]
pub struct JsRegistrationFlow {
    inner: RegistrationFlow,
}

#[wasm_bindgen]
impl JsRegistrationFlow {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsRegistrationFlow {
        JsRegistrationFlow {
            inner: RegistrationFlow::new(),
        }
    }

    /// Sets an input value by its form name (`fullName`, `email`, ...).
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const onChange = (e) => flow.setField(e.target.name, e.target.value);
    /// ```
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), JsValue> {
        let field = Field::parse(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown field: {}", name)))?;
        self.inner.set_field(field, value);
        Ok(())
    }

    /// Validates and advances; returns false and populates `errors()` on failure.
    #[wasm_bindgen(js_name = nextStep)]
    pub fn next_step(&mut self) -> bool {
        self.inner.next_step()
    }

    #[wasm_bindgen(js_name = previousStep)]
    pub fn previous_step(&mut self) -> bool {
        self.inner.previous_step()
    }

    #[wasm_bindgen(js_name = selectAvatar)]
    pub fn select_avatar(&mut self, id: u32) -> bool {
        self.inner.select_avatar(id)
    }

    /// Returns the route to navigate to, or undefined when not ready.
    pub fn submit(&self) -> Option<String> {
        self.inner.submit().map(str::to_string)
    }

    /// Current step number (1 or 2).
    pub fn step(&self) -> u8 {
        self.inner.step().number()
    }

    /// Field → message object.
    pub fn errors(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.errors())?)
    }

    pub fn avatars(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.avatars())?)
    }
}

impl Default for JsRegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

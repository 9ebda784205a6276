//! Registration module.
//!
//! Account form model, synchronous field validation and the two-step flow
//! that precedes onboarding.

pub mod flow;
pub mod model;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use flow::{RegistrationFlow, RegistrationStep};
pub use model::{Avatar, Field, RegistrationForm};
pub use validate::{validate_account, ValidationErrors};

#[cfg(feature = "wasm")]
pub use wasm::JsRegistrationFlow;

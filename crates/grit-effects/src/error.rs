//! Error types for effect construction and control.

use grit_core::{ControlError, PrepareError};
use thiserror::Error;

/// Errors from the effect registry and sessions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    /// No effect is registered under the id.
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    /// The effect does not expose the named control.
    #[error("effect '{effect}' has no control '{control}'")]
    UnknownControl {
        /// Effect id.
        effect: &'static str,
        /// Requested control id.
        control: String,
    },

    /// A control descriptor is invalid.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// The processor could not be prepared.
    #[error(transparent)]
    Prepare(#[from] PrepareError),
}

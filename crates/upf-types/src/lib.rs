// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! projection field kernel.

pub mod config;
pub mod error;
pub mod state;

pub use config::{FieldConfig, HomeostasisConfig, ScaleDirection, GOLDEN_RATIO};
pub use error::{UpfError, UpfResult};
pub use state::{clamp_bounded, clamp_unit, Actions, FieldState, RawInputs, StepRecord};

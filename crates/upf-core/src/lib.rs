// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Homeostasis Layer
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Homeostatic control of the projection field and the domain adapter
//! contract it consumes.
//!
//! # Invariants
//!
//! 1. **Policy stays in the unit interval**: `u_pos` and `u_neg` are
//!    clamped to [0, 1] after every update.
//!
//! 2. **No hidden state across instances**: each orchestrator owns its
//!    core and that core's noise generator. Two orchestrators built from
//!    the same seed and fed the same raw inputs produce identical records.
//!
//! 3. **Adapter errors are not reinterpreted**: whatever the adapter
//!    returns is handed back to the caller as-is.

pub mod adapter;
pub mod homeostasis;
pub mod orchestrator;

pub use adapter::{DomainAdapter, ExternalAdapter, FusionAdapter, QuantumAdapter};
pub use homeostasis::{drive_from, policy_delta, PolicyDelta, PolicyState, INPUT_BLEND, NEUTRAL};
pub use orchestrator::HomeostasisOrchestrator;

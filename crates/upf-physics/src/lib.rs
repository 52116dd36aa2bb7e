// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Field Dynamics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Projection field core: the bounded discrete-time state-update law
//! for a linear chain of (capacity, coherence, entropy) layers, plus its
//! seeded process-noise source.

pub mod field;
pub mod noise;
pub mod params;

pub use field::ProjectionFieldCore;
pub use noise::NoiseSource;
pub use params::{noise_assist_boost, DEFAULT_SEED};

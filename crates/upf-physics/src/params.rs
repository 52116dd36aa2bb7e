// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Canonical Constants
// ─────────────────────────────────────────────────────────────────────
//! Fixed constants of the state-update law. Everything tunable lives in
//! `FieldConfig`; these are part of the law itself.

/// Floor on the per-layer optimal entropy.
pub const E_OPT_FLOOR: f64 = 0.02;

/// Fractional drop of optimal entropy at full degradation (DOC = 1).
pub const E_OPT_DOC_SLOPE: f64 = 0.25;

/// Guard against division by a vanishing optimum.
pub const E_OPT_EPS: f64 = 1e-9;

/// Clip range of the entropy ratio fed to the resonance curve.
pub const BOOST_RATIO_MIN: f64 = 1e-6;
pub const BOOST_RATIO_MAX: f64 = 50.0;

/// Default noise seed.
pub const DEFAULT_SEED: u64 = 137;

/// Noise-assist boost: `x·exp(1 − x)` with `x = E / E_opt`.
///
/// Peaks at 1.0 when entropy sits at its optimum and decays toward 0 on
/// either side.
#[inline]
pub fn noise_assist_boost(e: f64, e_opt: f64) -> f64 {
    let x = (e / e_opt.max(E_OPT_EPS)).clamp(BOOST_RATIO_MIN, BOOST_RATIO_MAX);
    x * (1.0 - x).exp()
}

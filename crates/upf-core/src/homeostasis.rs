// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Homeostasis Controller
// ─────────────────────────────────────────────────────────────────────
//! Error-driven update of the two drive-bias policy variables.
//!
//!   err    = S_target − S_sum
//!   Δu_pos = η·err  (|err| > band)   or   ½η·err  (inside band)
//!          − ζ (u_pos − ½)
//!   Δu_neg = −η_neg·max(0, err) + ½ζ (½ − u_neg)
//!
//! `u_neg` only reacts to undershoot; both decay toward neutral.

use serde::{Deserialize, Serialize};

use upf_types::{clamp_unit, HomeostasisConfig};

/// Neutral policy value.
pub const NEUTRAL: f64 = 0.5;

/// Weight of the fresh adapter reading when blended with the policy.
pub const INPUT_BLEND: f64 = 0.42;

/// Policy variables `u_pos`, `u_neg` ∈ [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyState {
    pub u_pos: f64,
    pub u_neg: f64,
}

impl Default for PolicyState {
    fn default() -> Self {
        Self {
            u_pos: NEUTRAL,
            u_neg: NEUTRAL,
        }
    }
}

/// Breakdown of one homeostatic update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyDelta {
    pub err: f64,
    pub in_band: bool,
    /// Error-driven part of `Δu_pos` (before decay).
    pub du_pos_err: f64,
    pub du_pos: f64,
    pub du_neg: f64,
}

/// Compute the policy increments for aggregate output `s_sum`.
pub fn policy_delta(cfg: &HomeostasisConfig, policy: &PolicyState, s_sum: f64) -> PolicyDelta {
    let err = cfg.s_target - s_sum;
    let in_band = err.abs() <= cfg.s_band;

    let du_pos_err = if in_band {
        0.5 * cfg.eta * err
    } else {
        cfg.eta * err
    };
    let du_pos = du_pos_err - cfg.zeta * (policy.u_pos - NEUTRAL);
    let du_neg = -cfg.eta_neg * err.max(0.0) + 0.5 * cfg.zeta * (NEUTRAL - policy.u_neg);

    PolicyDelta {
        err,
        in_band,
        du_pos_err,
        du_pos,
        du_neg,
    }
}

impl PolicyState {
    pub fn new(u_pos: f64, u_neg: f64) -> Self {
        Self {
            u_pos: clamp_unit(u_pos),
            u_neg: clamp_unit(u_neg),
        }
    }

    /// Blend the policy with fresh normalized inputs.
    ///
    /// Returns `(u_pos_used, u_neg_used)`.
    pub fn blend(&self, u_pos_input: f64, u_neg_input: f64) -> (f64, f64) {
        (
            (1.0 - INPUT_BLEND) * self.u_pos + INPUT_BLEND * u_pos_input,
            (1.0 - INPUT_BLEND) * self.u_neg + INPUT_BLEND * u_neg_input,
        )
    }

    /// Apply one homeostatic update and clamp to [0, 1].
    pub fn update(&mut self, cfg: &HomeostasisConfig, s_sum: f64) -> PolicyDelta {
        let delta = policy_delta(cfg, self, s_sum);
        self.u_pos = clamp_unit(self.u_pos + delta.du_pos);
        self.u_neg = clamp_unit(self.u_neg + delta.du_neg);
        delta
    }
}

/// Saturating drive from the blended policy: `tanh(2(u_pos − α·u_neg))`.
#[inline]
pub fn drive_from(u_pos_used: f64, u_neg_used: f64, alpha: f64) -> f64 {
    (2.0 * (u_pos_used - alpha * u_neg_used)).tanh()
}

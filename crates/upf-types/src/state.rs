// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — State and Step Records
// ─────────────────────────────────────────────────────────────────────

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Raw domain measurements handed to an adapter, keyed by field name.
pub type RawInputs = HashMap<String, f64>;

/// Domain-meaningful scalars produced by an adapter's `interpret`.
pub type Actions = BTreeMap<String, f64>;

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_bounded(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_bounded: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_bounded: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Clamp to the unit interval.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    clamp_bounded(value, 0.0, 1.0)
}

/// Snapshot of the per-layer field state.
///
/// Serialized keys follow the `rho` / `C` / `E` / `S` naming used by
/// adapters and downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    /// Capacity per layer.
    pub rho: Vec<f64>,
    /// Coherence per layer.
    #[serde(rename = "C")]
    pub c: Vec<f64>,
    /// Entropy proxy per layer.
    #[serde(rename = "E")]
    pub e: Vec<f64>,
    /// Output of the most recent step per layer.
    #[serde(rename = "S")]
    pub s: Vec<f64>,
    /// Steps taken when the snapshot was captured.
    pub step: u64,
}

impl FieldState {
    pub fn levels(&self) -> usize {
        self.rho.len()
    }

    pub fn s_sum(&self) -> f64 {
        self.s.iter().sum()
    }

    /// True when all four per-layer arrays have the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.rho.len();
        self.c.len() == n && self.e.len() == n && self.s.len() == n
    }
}

/// Everything one orchestrator step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Adapter name.
    pub domain: String,
    /// Degradation (clamped to [0, 1]).
    #[serde(rename = "DOC")]
    pub doc: f64,
    /// Per-layer output of this step.
    #[serde(rename = "S_layers")]
    pub s_layers: Vec<f64>,
    #[serde(rename = "S_sum")]
    pub s_sum: f64,
    /// Policy/input blend that formed the drive.
    pub u_pos_used: f64,
    pub u_neg_used: f64,
    /// Policy after the homeostatic update.
    pub u_pos_policy: f64,
    pub u_neg_policy: f64,
    pub drive: f64,
    pub actions: Actions,
    /// Core state after the step.
    pub state: FieldState,
}

// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{UpfError, UpfResult};

/// Golden ratio, the default per-layer scale base.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Which end of the layer chain carries the largest scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleDirection {
    /// `scale(i) = phi^(L-1-i)`: layer 0 dominates.
    #[serde(alias = "up")]
    StrongestFirst,
    /// `scale(i) = phi^i`: the last layer dominates.
    #[serde(alias = "down")]
    StrongestLast,
}

/// Parameters of the projection field core.
///
/// Fixed for the lifetime of a core: baselines are snapshotted from
/// `rho_init`/`c_init`/`e_init` once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of layers in the chain.
    /// Default: 3.
    pub levels: usize,

    /// Scale base for per-layer scale factors and optimal entropy.
    /// Default: golden ratio.
    pub phi: f64,

    /// Entropy gain on the net increment (applied with negative sign).
    /// Default: 0.01.
    pub g_e: f64,
    /// Coherence gain on the net increment.
    /// Default: 0.02.
    pub g_c: f64,
    /// Capacity gain on the net increment.
    /// Default: 0.01.
    pub g_r: f64,

    /// Entropy leak toward baseline per step.
    /// Default: 0.02.
    pub leak_e: f64,
    /// Coherence leak toward baseline per step.
    /// Default: 0.02.
    pub leak_c: f64,
    /// Capacity leak toward baseline per step.
    /// Default: 0.02.
    pub leak_r: f64,

    /// Weight of the `drive·rho·C` term.
    /// Default: 0.55.
    pub k: f64,
    /// Weight of the noise-assist boost.
    /// Default: 0.18.
    pub beta: f64,
    /// Weight of the throughput multiplier `1 - DOC`.
    /// Default: 0.12.
    pub gamma: f64,

    /// Negative-drive penalty weight used when forming the drive.
    /// Default: 1.0 (symmetric).
    pub alpha: f64,
    /// Diffusive coupling strength between adjacent layers.
    /// Default: 0.04.
    pub kappa: f64,

    /// Optimal entropy of layer 0 at zero degradation.
    /// Default: 0.45.
    pub e_base: f64,
    /// Default: `StrongestFirst`.
    pub scale_direction: ScaleDirection,

    /// Standard deviation of the per-layer Gaussian process noise.
    /// Default: 0.008.
    pub process_noise_sigma: f64,

    pub e_min: f64,
    pub e_max: f64,
    pub c_min: f64,
    pub c_max: f64,
    pub rho_min: f64,
    pub rho_max: f64,

    /// Initial and baseline capacity. Default: 1.0.
    pub rho_init: f64,
    /// Initial and baseline coherence. Default: 0.62.
    pub c_init: f64,
    /// Initial and baseline entropy. Default: 0.38.
    pub e_init: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            levels: 3,
            phi: GOLDEN_RATIO,
            g_e: 0.01,
            g_c: 0.02,
            g_r: 0.01,
            leak_e: 0.02,
            leak_c: 0.02,
            leak_r: 0.02,
            k: 0.55,
            beta: 0.18,
            gamma: 0.12,
            alpha: 1.0,
            kappa: 0.04,
            e_base: 0.45,
            scale_direction: ScaleDirection::StrongestFirst,
            process_noise_sigma: 0.008,
            e_min: 0.01,
            e_max: 2.0,
            c_min: 0.0,
            c_max: 1.0,
            rho_min: 0.1,
            rho_max: 5.0,
            rho_init: 1.0,
            c_init: 0.62,
            e_init: 0.38,
        }
    }
}

fn check_bounds(name: &str, lo: f64, hi: f64, init: f64) -> UpfResult<()> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(UpfError::Config(format!(
            "{name} bounds must be finite, got [{lo}, {hi}]"
        )));
    }
    if lo > hi {
        return Err(UpfError::Config(format!(
            "{name}_min must be <= {name}_max, got [{lo}, {hi}]"
        )));
    }
    if !(lo..=hi).contains(&init) {
        return Err(UpfError::Config(format!(
            "{name}_init must lie in [{lo}, {hi}], got {init}"
        )));
    }
    Ok(())
}

impl FieldConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> UpfResult<()> {
        if self.levels < 1 {
            return Err(UpfError::Config(format!(
                "levels must be >= 1, got {}",
                self.levels
            )));
        }
        // Layer indices feed `f64::powi`.
        if self.levels > i32::MAX as usize {
            return Err(UpfError::Config(format!(
                "levels must be <= {}, got {}",
                i32::MAX,
                self.levels
            )));
        }
        if !self.phi.is_finite() || self.phi <= 0.0 {
            return Err(UpfError::Config(format!(
                "phi must be finite and > 0, got {}",
                self.phi
            )));
        }
        let gains = [
            ("g_e", self.g_e),
            ("g_c", self.g_c),
            ("g_r", self.g_r),
            ("leak_e", self.leak_e),
            ("leak_c", self.leak_c),
            ("leak_r", self.leak_r),
            ("k", self.k),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("alpha", self.alpha),
            ("kappa", self.kappa),
            ("e_base", self.e_base),
        ];
        for (name, value) in gains {
            if !value.is_finite() {
                return Err(UpfError::Config(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if !self.process_noise_sigma.is_finite() || self.process_noise_sigma < 0.0 {
            return Err(UpfError::Config(format!(
                "process_noise_sigma must be finite and >= 0, got {}",
                self.process_noise_sigma
            )));
        }
        check_bounds("e", self.e_min, self.e_max, self.e_init)?;
        check_bounds("c", self.c_min, self.c_max, self.c_init)?;
        check_bounds("rho", self.rho_min, self.rho_max, self.rho_init)?;
        // S = rho·C/(1+E) stays nonnegative only with these floors.
        if self.e_min <= -1.0 {
            return Err(UpfError::Config(format!(
                "e_min must be > -1, got {}",
                self.e_min
            )));
        }
        if self.c_min < 0.0 || self.rho_min < 0.0 {
            return Err(UpfError::Config(format!(
                "c_min and rho_min must be >= 0, got {} and {}",
                self.c_min, self.rho_min
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> UpfResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| UpfError::Config(format!("JSON parse error: {e}")))
    }
}

/// Gains and setpoint of the homeostasis controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeostasisConfig {
    /// Target aggregate output `S_sum`.
    /// Default: 1.92.
    pub s_target: f64,
    /// Proportional gain on `u_pos` outside the dead-band (halved inside).
    /// Default: 0.065.
    pub eta: f64,
    /// Decay-to-neutral gain.
    /// Default: 0.038.
    pub zeta: f64,
    /// Gain of `u_neg` on output undershoot.
    /// Default: 0.052.
    pub eta_neg: f64,
    /// Dead-band half-width around `s_target`.
    /// Default: 0.22.
    pub s_band: f64,
}

impl Default for HomeostasisConfig {
    fn default() -> Self {
        Self {
            s_target: 1.92,
            eta: 0.065,
            zeta: 0.038,
            eta_neg: 0.052,
            s_band: 0.22,
        }
    }
}

impl HomeostasisConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> UpfResult<()> {
        if !self.s_target.is_finite() {
            return Err(UpfError::Config(format!(
                "s_target must be finite, got {}",
                self.s_target
            )));
        }
        for (name, value) in [
            ("eta", self.eta),
            ("zeta", self.zeta),
            ("eta_neg", self.eta_neg),
            ("s_band", self.s_band),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(UpfError::Config(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> UpfResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| UpfError::Config(format!("JSON parse error: {e}")))
    }
}

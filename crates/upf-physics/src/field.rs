// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Field Core
// ─────────────────────────────────────────────────────────────────────
//! Bounded N-layer projection field. Per layer ℓ:
//!
//!   S_ℓ  = ρ_ℓ C_ℓ / (1 + E_ℓ) · s(ℓ) · (1 − DOC)
//!   ΔS_ℓ = k·drive·ρ_ℓ C_ℓ + β·boost(E_ℓ, E*_ℓ) + γ(1 − DOC)
//!        + κ Σ_{m ∈ {ℓ±1}} (S_m − S_ℓ) + η_ℓ
//!   E_ℓ ← clip(E_ℓ − g_E ΔS_ℓ + λ_E (E⁰_ℓ − E_ℓ))
//!   C_ℓ ← clip(C_ℓ + g_C ΔS_ℓ + λ_C (C⁰_ℓ − C_ℓ))
//!   ρ_ℓ ← clip(ρ_ℓ + g_R ΔS_ℓ + λ_R (ρ⁰_ℓ − ρ_ℓ))
//!
//! Coupling reads the outputs of the state as it stood at step start.

use upf_types::{clamp_bounded, FieldConfig, FieldState, ScaleDirection, UpfError, UpfResult};

use crate::noise::NoiseSource;
use crate::params::{noise_assist_boost, E_OPT_DOC_SLOPE, E_OPT_FLOOR};

/// Stable, bounded, N-layer projection field core.
pub struct ProjectionFieldCore {
    cfg: FieldConfig,
    seed: u64,
    rho: Vec<f64>,
    c: Vec<f64>,
    e: Vec<f64>,
    // Baselines: written once in `new`, read-only afterward.
    rho0: Vec<f64>,
    c0: Vec<f64>,
    e0: Vec<f64>,
    last_s: Vec<f64>,
    scale: Vec<f64>,
    // Pre-allocated scratch
    s_prev: Vec<f64>,
    noise: NoiseSource,
    step_count: u64,
}

impl ProjectionFieldCore {
    pub fn new(cfg: FieldConfig, seed: u64) -> UpfResult<Self> {
        cfg.validate()?;
        let n = cfg.levels;

        let scale: Vec<f64> = (0..n)
            .map(|ell| match cfg.scale_direction {
                ScaleDirection::StrongestFirst => cfg.phi.powi((n - 1 - ell) as i32),
                ScaleDirection::StrongestLast => cfg.phi.powi(ell as i32),
            })
            .collect();

        let rho = vec![cfg.rho_init; n];
        let c = vec![cfg.c_init; n];
        let e = vec![cfg.e_init; n];

        log::info!("projection field core: {n} layers, seed={seed}");

        Ok(Self {
            rho0: rho.clone(),
            c0: c.clone(),
            e0: e.clone(),
            rho,
            c,
            e,
            last_s: vec![0.0; n],
            scale,
            s_prev: vec![0.0; n],
            noise: NoiseSource::new(seed),
            step_count: 0,
            seed,
            cfg,
        })
    }

    /// Default configuration, given seed.
    pub fn with_seed(seed: u64) -> UpfResult<Self> {
        Self::new(FieldConfig::default(), seed)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }

    pub fn levels(&self) -> usize {
        self.cfg.levels
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Output of the most recent step (zeros before the first).
    pub fn last_output(&self) -> &[f64] {
        &self.last_s
    }

    /// Per-layer scale factor.
    pub fn scale_factor(&self, ell: usize) -> f64 {
        self.scale[ell]
    }

    /// Optimal entropy of layer `ell` at degradation `doc`.
    pub fn optimal_entropy(&self, ell: usize, doc: f64) -> f64 {
        let base = self.cfg.e_base / self.cfg.phi.powi(ell as i32);
        (base * (1.0 - E_OPT_DOC_SLOPE * doc)).max(E_OPT_FLOOR)
    }

    #[inline]
    fn layer_output(&self, ell: usize, throughput: f64) -> f64 {
        self.rho[ell] * self.c[ell] / (1.0 + self.e[ell]) * self.scale[ell] * throughput
    }

    /// Per-layer output of the current state at degradation `doc`.
    ///
    /// Does not advance the field.
    pub fn outputs_at(&self, doc: f64) -> Vec<f64> {
        let throughput = 1.0 - clamp_bounded(doc, 0.0, 1.0);
        (0..self.cfg.levels)
            .map(|ell| self.layer_output(ell, throughput))
            .collect()
    }

    /// Advance the field by one step.
    ///
    /// `degradation` is clamped to [0, 1]; `drive` is used as given.
    pub fn step(&mut self, drive: f64, degradation: f64) -> Vec<f64> {
        let doc = clamp_bounded(degradation, 0.0, 1.0);
        let throughput = 1.0 - doc;
        let n = self.cfg.levels;

        for ell in 0..n {
            self.s_prev[ell] = self.layer_output(ell, throughput);
        }

        let mut s_layers = vec![0.0; n];

        for ell in 0..n {
            let boost = noise_assist_boost(self.e[ell], self.optimal_entropy(ell, doc));

            let mut coupling = 0.0;
            if self.cfg.kappa != 0.0 {
                if ell > 0 {
                    coupling += self.s_prev[ell - 1] - self.s_prev[ell];
                }
                if ell + 1 < n {
                    coupling += self.s_prev[ell + 1] - self.s_prev[ell];
                }
                coupling *= self.cfg.kappa;
            }

            let delta_s = self.cfg.k * drive * self.rho[ell] * self.c[ell]
                + self.cfg.beta * boost
                + self.cfg.gamma * throughput
                + coupling
                + self.noise.gaussian(self.cfg.process_noise_sigma);

            // Entropy moves against coherence and capacity.
            self.e[ell] = clamp_bounded(
                self.e[ell] - self.cfg.g_e * delta_s + self.cfg.leak_e * (self.e0[ell] - self.e[ell]),
                self.cfg.e_min,
                self.cfg.e_max,
            );
            self.c[ell] = clamp_bounded(
                self.c[ell] + self.cfg.g_c * delta_s + self.cfg.leak_c * (self.c0[ell] - self.c[ell]),
                self.cfg.c_min,
                self.cfg.c_max,
            );
            self.rho[ell] = clamp_bounded(
                self.rho[ell]
                    + self.cfg.g_r * delta_s
                    + self.cfg.leak_r * (self.rho0[ell] - self.rho[ell]),
                self.cfg.rho_min,
                self.cfg.rho_max,
            );

            s_layers[ell] = self.layer_output(ell, throughput);
        }

        self.step_count += 1;
        self.last_s.copy_from_slice(&s_layers);
        log::trace!(
            "field step {}: drive={drive:.4} DOC={doc:.3} S={s_layers:?}",
            self.step_count
        );
        s_layers
    }

    /// Run a sequence of `(drive, degradation)` steps.
    pub fn run(&mut self, inputs: &[(f64, f64)]) -> Vec<Vec<f64>> {
        inputs
            .iter()
            .map(|&(drive, doc)| self.step(drive, doc))
            .collect()
    }

    /// Copy of the live state.
    pub fn snapshot(&self) -> FieldState {
        FieldState {
            rho: self.rho.clone(),
            c: self.c.clone(),
            e: self.e.clone(),
            s: self.last_s.clone(),
            step: self.step_count,
        }
    }

    /// Construction-time baseline triple (`S` is zero).
    pub fn baseline(&self) -> FieldState {
        FieldState {
            rho: self.rho0.clone(),
            c: self.c0.clone(),
            e: self.e0.clone(),
            s: vec![0.0; self.cfg.levels],
            step: 0,
        }
    }

    /// Overwrite the live state from a snapshot.
    ///
    /// Values are clamped to the configured bounds. Baselines and the
    /// noise generator are left untouched.
    pub fn restore(&mut self, state: &FieldState) -> UpfResult<()> {
        let n = self.cfg.levels;
        if state.levels() != n {
            return Err(UpfError::Shape {
                expected: n,
                got: state.levels(),
            });
        }
        if !state.is_consistent() {
            let got = [state.c.len(), state.e.len(), state.s.len()]
                .into_iter()
                .find(|&len| len != n)
                .unwrap_or(n);
            return Err(UpfError::Shape { expected: n, got });
        }
        let all = state
            .rho
            .iter()
            .chain(&state.c)
            .chain(&state.e)
            .chain(&state.s);
        for &v in all {
            if !v.is_finite() {
                return Err(UpfError::Numerical(
                    "restored state contains NaN or Inf".to_string(),
                ));
            }
        }

        for ell in 0..n {
            self.rho[ell] = state.rho[ell].clamp(self.cfg.rho_min, self.cfg.rho_max);
            self.c[ell] = state.c[ell].clamp(self.cfg.c_min, self.cfg.c_max);
            self.e[ell] = state.e[ell].clamp(self.cfg.e_min, self.cfg.e_max);
            self.last_s[ell] = state.s[ell].max(0.0);
        }
        self.step_count = state.step;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DEFAULT_SEED;

    fn assert_bounded(core: &ProjectionFieldCore) {
        let cfg = core.config();
        let st = core.snapshot();
        for ell in 0..core.levels() {
            assert!(
                (cfg.rho_min..=cfg.rho_max).contains(&st.rho[ell]),
                "rho[{ell}]={} out of bounds",
                st.rho[ell]
            );
            assert!(
                (cfg.c_min..=cfg.c_max).contains(&st.c[ell]),
                "C[{ell}]={} out of bounds",
                st.c[ell]
            );
            assert!(
                (cfg.e_min..=cfg.e_max).contains(&st.e[ell]),
                "E[{ell}]={} out of bounds",
                st.e[ell]
            );
            assert!(st.s[ell] >= 0.0, "S[{ell}]={} negative", st.s[ell]);
        }
    }

    #[test]
    fn test_single_step_scenario() {
        let mut core = ProjectionFieldCore::with_seed(DEFAULT_SEED).unwrap();
        let s = core.step(0.2, 0.1);
        assert_eq!(s.len(), 3);
        assert!(s.iter().all(|v| v.is_finite() && *v >= 0.0), "S={s:?}");

        let mut twin = ProjectionFieldCore::with_seed(DEFAULT_SEED).unwrap();
        let s2 = twin.step(0.2, 0.1);
        for (a, b) in s.iter().zip(&s2) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_determinism_over_trajectory() {
        let inputs: Vec<(f64, f64)> = (0..200)
            .map(|t| (((t as f64) * 0.13).sin(), 0.5 + 0.5 * ((t as f64) * 0.07).cos()))
            .collect();
        let mut a = ProjectionFieldCore::with_seed(9).unwrap();
        let mut b = ProjectionFieldCore::with_seed(9).unwrap();
        assert_eq!(a.run(&inputs), b.run(&inputs));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_seed_changes_trajectory() {
        let mut a = ProjectionFieldCore::with_seed(1).unwrap();
        let mut b = ProjectionFieldCore::with_seed(2).unwrap();
        assert_ne!(a.step(0.2, 0.1), b.step(0.2, 0.1));
    }

    #[test]
    fn test_layer_count_invariance() {
        for levels in [1, 2, 3, 7] {
            let cfg = FieldConfig {
                levels,
                ..Default::default()
            };
            let mut core = ProjectionFieldCore::new(cfg, 5).unwrap();
            for &(drive, doc) in &[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (-1.0, 1.0), (0.3, 0.5)] {
                assert_eq!(core.step(drive, doc).len(), levels);
            }
        }
    }

    #[test]
    fn test_boundedness_under_extreme_drive() {
        let mut core = ProjectionFieldCore::with_seed(11).unwrap();
        for t in 0..500 {
            let drive = if (t / 50) % 2 == 0 { 1e6 } else { -1e6 };
            let doc = if t % 3 == 0 { -2.0 } else { 3.0 };
            core.step(drive, doc);
            assert_bounded(&core);
        }
    }

    #[test]
    fn test_boundedness_non_finite_drive() {
        let mut core = ProjectionFieldCore::with_seed(11).unwrap();
        for drive in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 0.0] {
            let s = core.step(drive, 0.2);
            assert_bounded(&core);
            assert!(s.iter().all(|v| v.is_finite()), "S={s:?}");
        }
    }

    #[test]
    fn test_full_degradation_zero_output() {
        let mut core = ProjectionFieldCore::with_seed(3).unwrap();
        core.step(0.5, 0.0);
        let s = core.step(0.5, 1.0);
        assert!(s.iter().all(|&v| v == 0.0), "S={s:?}");
        assert!(core.outputs_at(1.0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_degradation_damping() {
        let mut core = ProjectionFieldCore::with_seed(3).unwrap();
        core.step(0.4, 0.2);
        let docs = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99];
        let outputs: Vec<Vec<f64>> = docs.iter().map(|&d| core.outputs_at(d)).collect();
        for w in outputs.windows(2) {
            for ell in 0..core.levels() {
                assert!(
                    w[1][ell] < w[0][ell],
                    "S[{ell}] not decreasing: {} -> {}",
                    w[0][ell],
                    w[1][ell]
                );
            }
        }
    }

    #[test]
    fn test_outputs_at_does_not_mutate() {
        let core = ProjectionFieldCore::with_seed(3).unwrap();
        let before = core.snapshot();
        let _ = core.outputs_at(0.3);
        assert_eq!(core.snapshot(), before);
    }

    #[test]
    fn test_first_step_uses_baseline_snapshot() {
        // Noise-free, no coupling: each layer sees only its own triple.
        let cfg = FieldConfig {
            process_noise_sigma: 0.0,
            kappa: 0.0,
            ..Default::default()
        };
        let mut core = ProjectionFieldCore::new(cfg.clone(), 1).unwrap();
        let s = core.step(0.0, 0.0);

        let boost = noise_assist_boost(cfg.e_init, core.optimal_entropy(0, 0.0));
        let delta_s = cfg.beta * boost + cfg.gamma;
        let e = cfg.e_init - cfg.g_e * delta_s;
        let c = cfg.c_init + cfg.g_c * delta_s;
        let rho = cfg.rho_init + cfg.g_r * delta_s;
        let expected = rho * c / (1.0 + e) * core.scale_factor(0);
        assert!((s[0] - expected).abs() < 1e-12, "S[0]={} expected={expected}", s[0]);
    }

    #[test]
    fn test_coupling_uses_previous_outputs() {
        let cfg = FieldConfig {
            process_noise_sigma: 0.0,
            ..Default::default()
        };
        let mut coupled = ProjectionFieldCore::new(cfg.clone(), 1).unwrap();
        let mut uncoupled = ProjectionFieldCore::new(
            FieldConfig {
                kappa: 0.0,
                ..cfg
            },
            1,
        )
        .unwrap();
        let s_c = coupled.step(0.0, 0.0);
        let s_u = uncoupled.step(0.0, 0.0);
        // Layer 0 is the strongest; diffusion pulls it down, and lifts the weakest.
        assert!(s_c[0] < s_u[0], "coupled={} uncoupled={}", s_c[0], s_u[0]);
        assert!(s_c[2] > s_u[2], "coupled={} uncoupled={}", s_c[2], s_u[2]);
    }

    #[test]
    fn test_scale_direction() {
        let first = ProjectionFieldCore::with_seed(1).unwrap();
        let phi = first.config().phi;
        assert!((first.scale_factor(0) - phi * phi).abs() < 1e-12);
        assert!((first.scale_factor(2) - 1.0).abs() < 1e-12);

        let last = ProjectionFieldCore::new(
            FieldConfig {
                scale_direction: ScaleDirection::StrongestLast,
                ..Default::default()
            },
            1,
        )
        .unwrap();
        assert!((last.scale_factor(0) - 1.0).abs() < 1e-12);
        assert!((last.scale_factor(2) - phi * phi).abs() < 1e-12);
    }

    #[test]
    fn test_optimal_entropy() {
        let core = ProjectionFieldCore::with_seed(1).unwrap();
        assert!((core.optimal_entropy(0, 0.0) - 0.45).abs() < 1e-12);
        // Deeper layers and higher degradation lower the optimum.
        assert!(core.optimal_entropy(1, 0.0) < core.optimal_entropy(0, 0.0));
        assert!(core.optimal_entropy(0, 1.0) < core.optimal_entropy(0, 0.0));
        assert!((core.optimal_entropy(0, 1.0) - 0.45 * 0.75).abs() < 1e-12);
        // Floor
        assert!((core.optimal_entropy(40, 0.0) - E_OPT_FLOOR).abs() < 1e-12);
    }

    #[test]
    fn test_baseline_immutable() {
        let mut core = ProjectionFieldCore::with_seed(4).unwrap();
        let base = core.baseline();
        for _ in 0..100 {
            core.step(0.9, 0.3);
        }
        assert_eq!(core.baseline(), base);
        assert_ne!(core.snapshot().c, base.c);
    }

    #[test]
    fn test_leak_returns_toward_baseline() {
        let cfg = FieldConfig {
            process_noise_sigma: 0.0,
            ..Default::default()
        };
        let mut core = ProjectionFieldCore::new(cfg, 1).unwrap();
        for _ in 0..300 {
            core.step(1.0, 0.0);
        }
        let pushed = core.snapshot().c[1];
        for _ in 0..300 {
            core.step(-1.0, 0.0);
        }
        let relaxed = core.snapshot().c[1];
        assert!(relaxed < pushed, "pushed={pushed} relaxed={relaxed}");
    }

    #[test]
    fn test_snapshot_tracks_last_output() {
        let mut core = ProjectionFieldCore::with_seed(2).unwrap();
        assert!(core.last_output().iter().all(|&v| v == 0.0));
        let s = core.step(0.1, 0.1);
        assert_eq!(core.snapshot().s, s);
        assert_eq!(core.step_count(), 1);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut core = ProjectionFieldCore::with_seed(8).unwrap();
        core.run(&[(0.3, 0.1); 20]);
        let saved = core.snapshot();
        core.run(&[(-0.8, 0.6); 20]);
        core.restore(&saved).unwrap();
        assert_eq!(core.snapshot(), saved);
    }

    #[test]
    fn test_restore_shape_mismatch_rejected() {
        let mut core = ProjectionFieldCore::with_seed(8).unwrap();
        let mut state = core.snapshot();
        state.e.pop();
        assert_eq!(
            core.restore(&state),
            Err(UpfError::Shape {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn test_restore_wrong_level_count_rejected() {
        let mut core = ProjectionFieldCore::with_seed(8).unwrap();
        let before = core.snapshot();
        let mut state = before.clone();
        for v in [&mut state.rho, &mut state.c, &mut state.e, &mut state.s] {
            v.push(0.5);
        }
        assert!(state.is_consistent());
        assert_eq!(
            core.restore(&state),
            Err(UpfError::Shape {
                expected: 3,
                got: 4
            })
        );
        assert_eq!(core.snapshot(), before);
    }

    #[test]
    fn test_restore_nan_rejected() {
        let mut core = ProjectionFieldCore::with_seed(8).unwrap();
        let mut state = core.snapshot();
        state.rho[0] = f64::NAN;
        assert!(matches!(core.restore(&state), Err(UpfError::Numerical(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = FieldConfig {
            levels: 0,
            ..Default::default()
        };
        assert!(matches!(
            ProjectionFieldCore::new(cfg, 1),
            Err(UpfError::Config(_))
        ));
    }
}
